//! `shopfiles list` – print `{"files": [...], "total": n}` on stdout.

use anyhow::Result;
use shopfiles_core::config::ShopConfig;
use shopfiles_core::export::render_json;

use super::collect::collect_with_progress;

pub fn run_list(cfg: &ShopConfig) -> Result<()> {
    let collection = collect_with_progress(cfg, false);
    print!("{}", render_json(&collection.records)?);
    Ok(())
}
