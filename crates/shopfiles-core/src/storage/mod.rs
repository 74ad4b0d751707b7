//! Disk output and file lifecycle.
//!
//! Everything the tools write (downloaded files, exports) goes to a `.part`
//! temp file first and is renamed to its final name only once complete.

mod part_file;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use part_file::PartFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `hero.jpg` → `hero.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `final_path` through a part file, replacing any existing file.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    let mut part = PartFile::create(final_path)?;
    part.write_all(data)?;
    part.finalize()?;
    Ok(())
}
