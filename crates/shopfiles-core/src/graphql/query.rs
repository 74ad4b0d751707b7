//! The files query and its request body.

use serde::Serialize;

/// Items requested per page (the Admin API maximum).
pub const PAGE_SIZE: u32 = 250;

/// Lists store files; MediaImage nodes carry the URL under `image`, GenericFile nodes directly.
pub const FILES_QUERY: &str = r#"query getFiles($first: Int!, $cursor: String) {
  files(first: $first, after: $cursor) {
    edges {
      node {
        ... on MediaImage {
          image {
            url
          }
        }
        ... on GenericFile {
          url
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub struct FilesRequest<'a> {
    pub query: &'static str,
    pub variables: FilesVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct FilesVariables<'a> {
    pub first: u32,
    /// Omitted on the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'a str>,
}

impl<'a> FilesRequest<'a> {
    pub fn new(cursor: Option<&'a str>) -> Self {
        Self {
            query: FILES_QUERY,
            variables: FilesVariables {
                first: PAGE_SIZE,
                cursor,
            },
        }
    }

    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
