//! `shopfiles download` – save every store file into a directory.

use anyhow::Result;
use shopfiles_core::config::ShopConfig;
use shopfiles_core::downloader::{DownloadOutcome, Downloader};

use super::collect::collect_with_progress;

pub fn run_download(cfg: &ShopConfig) -> Result<()> {
    let collection = collect_with_progress(cfg, true);
    println!("\nTotal files found: {}", collection.len());

    let downloader = Downloader::from_config(cfg);
    println!("Downloading into {}\n", downloader.dir().display());

    let summary = downloader.download_all(&collection.records, |p| match p.outcome {
        DownloadOutcome::Downloaded { bytes } => println!(
            "[{}/{}] Downloaded: {} ({} bytes)",
            p.index, p.total, p.record.filename, bytes
        ),
        DownloadOutcome::Skipped => println!(
            "[{}/{}] Skip (already exists): {}",
            p.index, p.total, p.record.filename
        ),
        DownloadOutcome::Failed(err) => println!(
            "[{}/{}] ERROR {}: {:#}",
            p.index, p.total, p.record.filename, err
        ),
    })?;

    println!(
        "\nDone: {} downloaded, {} skipped, {} failed of {} in '{}'",
        summary.downloaded,
        summary.skipped,
        summary.failed,
        summary.total,
        downloader.dir().display()
    );
    Ok(())
}
