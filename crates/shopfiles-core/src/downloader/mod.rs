//! Downloader: saves every collected file into one directory.
//!
//! Files are processed one at a time. A file whose target name already exists
//! is skipped without looking at its contents; a failed file is reported and
//! the batch moves on. Nothing is retried.

mod fetch;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::collector::FileRecord;
use crate::config::ShopConfig;
use crate::storage::PartFile;

pub use fetch::{fetch_into, FetchOptions, MAX_TRANSFER_TIME, STALL_SPEED_LIMIT};

/// What happened to one record.
#[derive(Debug)]
pub enum DownloadOutcome {
    Downloaded { bytes: u64 },
    /// A file with the target name was already present.
    Skipped,
    Failed(anyhow::Error),
}

/// Per-item report passed to the progress callback.
#[derive(Debug)]
pub struct ItemProgress<'a> {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub record: &'a FileRecord,
    pub path: &'a Path,
    pub outcome: &'a DownloadOutcome,
}

/// Totals for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub total: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Bytes written by this run.
    pub bytes: u64,
}

impl DownloadSummary {
    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Downloads records into `dir`, one file per record, named by its sanitized filename.
#[derive(Debug, Clone)]
pub struct Downloader {
    dir: PathBuf,
    opts: FetchOptions,
}

impl Downloader {
    pub fn new(dir: impl Into<PathBuf>, opts: FetchOptions) -> Self {
        Self {
            dir: dir.into(),
            opts,
        }
    }

    pub fn from_config(cfg: &ShopConfig) -> Self {
        Self::new(cfg.download_dir.clone(), FetchOptions::from_config(cfg))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn target_path(&self, record: &FileRecord) -> PathBuf {
        self.dir.join(&record.filename)
    }

    /// Download one record unless its target file already exists.
    pub fn download_one(&self, record: &FileRecord) -> DownloadOutcome {
        let path = self.target_path(record);
        if path.exists() {
            tracing::debug!(path = %path.display(), "target exists, skipping");
            return DownloadOutcome::Skipped;
        }

        match self.fetch_to(&record.url, &path) {
            Ok(bytes) => {
                tracing::info!(url = %record.url, bytes, "downloaded {}", record.filename);
                DownloadOutcome::Downloaded { bytes }
            }
            Err(e) => {
                tracing::warn!(url = %record.url, "download failed: {:#}", e);
                DownloadOutcome::Failed(e)
            }
        }
    }

    /// The part file is dropped (and removed) on any error before `finalize`.
    fn fetch_to(&self, url: &str, path: &Path) -> Result<u64> {
        let mut part = PartFile::create(path)?;
        fetch_into(url, &mut part, &self.opts)?;
        part.finalize()
    }

    /// Download all records in order, creating the target directory first.
    /// Only a failure to create the directory aborts the batch.
    pub fn download_all<F>(&self, records: &[FileRecord], mut on_item: F) -> Result<DownloadSummary>
    where
        F: FnMut(&ItemProgress),
    {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir {}", self.dir.display()))?;

        let total = records.len();
        let mut summary = DownloadSummary {
            total,
            ..DownloadSummary::default()
        };

        for (i, record) in records.iter().enumerate() {
            let outcome = self.download_one(record);
            summary.record(&outcome);
            let path = self.target_path(record);
            on_item(&ItemProgress {
                index: i + 1,
                total,
                record,
                path: &path,
                outcome: &outcome,
            });
        }

        tracing::info!(
            total = summary.total,
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "download batch finished"
        );
        Ok(summary)
    }
}
