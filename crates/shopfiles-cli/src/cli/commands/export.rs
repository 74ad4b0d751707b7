//! `shopfiles export` – write the filename,url table.

use anyhow::Result;
use shopfiles_core::config::ShopConfig;
use shopfiles_core::export::{export_records, ExportFormat, ExportOutcome};
use std::path::Path;

use super::collect::collect_with_progress;

pub fn run_export(cfg: &ShopConfig, output: &Path, format: ExportFormat) -> Result<()> {
    let collection = collect_with_progress(cfg, true);

    match export_records(&collection.records, output, format)? {
        ExportOutcome::Empty => println!("\nNo files to save; {} left untouched.", output.display()),
        ExportOutcome::Written { path, rows } => {
            println!("\nDone! {} file(s) saved to '{}' ({})", rows, path.display(), format)
        }
    }
    Ok(())
}
