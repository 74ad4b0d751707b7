//! Sequential writer for `.part` files that are renamed into place on success.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Temp file next to its final path. Bytes are written sequentially; `finalize`
/// syncs and renames to the final name. Dropping an unfinalized part file
/// removes it, so a failed transfer leaves nothing behind.
pub struct PartFile {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
    finalized: bool,
}

impl PartFile {
    /// Create `<final_path>.part`, truncating a stale one from an interrupted run.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(PartFile {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
            written: 0,
            finalized: false,
        })
    }

    /// Append `data` to the temp file.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "part file already closed"))?;
        file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Flush, sync and atomically rename the temp file to the final path.
    /// Replaces an existing file at the final path. Returns the bytes written.
    pub fn finalize(mut self) -> Result<u64> {
        if let Some(file) = self.file.take() {
            let file = file
                .into_inner()
                .map_err(|e| e.into_error())
                .context("storage flush failed")?;
            file.sync_all().context("storage sync failed")?;
        }

        std::fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        self.finalized = true;
        Ok(self.written)
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        drop(self.file.take());
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("could not remove {}: {}", self.temp_path.display(), e);
            }
        }
    }
}
