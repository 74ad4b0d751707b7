//! Shopify Admin GraphQL access for the store files listing.
//!
//! `query` builds the request body, `response` decodes pages, `client` sends
//! them with libcurl.

mod client;
mod error;
mod query;
mod response;

pub use client::GraphqlClient;
pub use error::FetchError;
pub use query::{FilesRequest, FILES_QUERY, PAGE_SIZE};
pub use response::{FileNode, FilesPage, GraphqlResponse, PageInfo};
