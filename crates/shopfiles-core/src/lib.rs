pub mod config;
pub mod logging;

pub mod collector;
pub mod downloader;
pub mod export;
pub mod graphql;
pub mod storage;
pub mod url_model;

pub use collector::{collect_files, collect_files_with, Collection, FileRecord, PageProgress, PageSource};
pub use graphql::{FetchError, GraphqlClient};
