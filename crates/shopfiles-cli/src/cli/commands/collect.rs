//! Shared listing step for every command.

use shopfiles_core::config::ShopConfig;
use shopfiles_core::{collect_files_with, Collection, GraphqlClient};

/// Walk the store's files listing. A listing that stops early is reported
/// on stderr and the records gathered so far are returned.
pub(super) fn collect_with_progress(cfg: &ShopConfig, show_progress: bool) -> Collection {
    let mut client = GraphqlClient::from_config(cfg);
    if show_progress {
        println!("Collecting file URLs from {}...", cfg.shop_host());
    }

    let collection = collect_files_with(
        &mut client,
        |page| {
            if show_progress {
                println!("Fetching page {}...", page);
            }
        },
        |p| {
            if show_progress {
                println!("  {} file(s) on page, collected: {} file(s)", p.page_items, p.total);
            }
        },
    );

    if let Some(err) = &collection.interrupted {
        eprintln!(
            "warning: file listing stopped after {} page(s): {}",
            collection.pages, err
        );
        eprintln!(
            "warning: continuing with the {} file(s) collected so far",
            collection.len()
        );
    }
    collection
}
