//! CLI command handlers. Each command is in its own file.

mod collect;
mod download;
mod export;
mod list;

pub use download::run_download;
pub use export::run_export;
pub use list::run_list;
