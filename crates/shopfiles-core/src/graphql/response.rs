//! Response shapes for the files query.

use serde::Deserialize;
use serde_json::Value;

use super::FetchError;

/// Top-level GraphQL envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<FilesData>,
    #[serde(default)]
    pub errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct FilesData {
    pub files: Option<FilesConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesConnection {
    #[serde(default)]
    pub edges: Vec<FileEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub struct FileEdge {
    pub node: FileNode,
}

/// A MediaImage (`image.url`) or GenericFile (`url`) node. Other file types
/// decode with both fields absent.
#[derive(Debug, Default, Deserialize)]
pub struct FileNode {
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One decoded page of the files listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesPage {
    /// File URLs in server order; nodes without a URL are dropped.
    pub urls: Vec<String>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl FileNode {
    /// Image URL if present, else the direct URL. Empty strings count as absent.
    pub fn file_url(&self) -> Option<&str> {
        let image_url = self
            .image
            .as_ref()
            .and_then(|img| img.url.as_deref())
            .filter(|u| !u.is_empty());
        image_url.or_else(|| self.url.as_deref().filter(|u| !u.is_empty()))
    }
}

impl GraphqlResponse {
    /// An `errors` payload wins over any data that came with it.
    pub fn into_page(self) -> Result<FilesPage, FetchError> {
        if let Some(errors) = self.errors.as_ref().filter(|e| !e.is_null()) {
            return Err(FetchError::Api(render_errors(errors)));
        }
        let files = self
            .data
            .and_then(|d| d.files)
            .ok_or(FetchError::MissingData)?;

        let urls = files
            .edges
            .iter()
            .filter_map(|edge| edge.node.file_url())
            .map(str::to_string)
            .collect();

        Ok(FilesPage {
            urls,
            has_next_page: files.page_info.has_next_page,
            end_cursor: files.page_info.end_cursor,
        })
    }
}

/// Flatten a GraphQL `errors` value: messages of an error list, or a bare string.
pub(crate) fn render_errors(errors: &Value) -> String {
    match errors {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("message").and_then(Value::as_str) {
                    Some(m) => m.to_string(),
                    None => item.to_string(),
                })
                .collect();
            messages.join("; ")
        }
        other => other.to_string(),
    }
}
