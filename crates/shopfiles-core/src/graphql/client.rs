//! Blocking GraphQL client over libcurl.

use std::time::Duration;

use crate::collector::PageSource;
use crate::config::ShopConfig;
use crate::downloader::{MAX_TRANSFER_TIME, STALL_SPEED_LIMIT};

use super::query::FilesRequest;
use super::response::{FilesPage, GraphqlResponse};
use super::FetchError;

/// Longest response body quoted in an HTTP error.
const ERROR_BODY_LIMIT: usize = 512;

/// Posts the files query to one store's Admin GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    api_url: String,
    access_token: Option<String>,
    connect_timeout: Duration,
    stall_timeout: Duration,
}

impl GraphqlClient {
    pub fn new(api_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            access_token,
            connect_timeout: Duration::from_secs(15),
            stall_timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(cfg: &ShopConfig) -> Self {
        Self::new(cfg.api_url(), cfg.access_token.clone())
            .with_connect_timeout(cfg.connect_timeout())
            .with_stall_timeout(cfg.download_timeout())
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// A request that receives nothing for this long fails.
    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// POST a JSON body and return the status code and raw response body.
    fn post_json(&self, body: &[u8]) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.api_url)?;
        easy.post(true)?;
        easy.post_fields_copy(body)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.low_speed_limit(STALL_SPEED_LIMIT)?;
        easy.low_speed_time(self.stall_timeout)?;
        easy.timeout(MAX_TRANSFER_TIME)?;

        let mut list = curl::easy::List::new();
        list.append("Content-Type: application/json")?;
        list.append("Accept: application/json")?;
        if let Some(token) = &self.access_token {
            list.append(&format!("X-Shopify-Access-Token: {}", token.trim()))?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, response))
    }

    /// Fetch one page of the files listing starting after `cursor`.
    pub fn fetch_files_page(&self, cursor: Option<&str>) -> Result<FilesPage, FetchError> {
        let body = FilesRequest::new(cursor).to_body()?;
        let (status, raw) = self.post_json(&body)?;
        tracing::debug!(status, bytes = raw.len(), "files query response");

        if !(200..300).contains(&status) {
            // Auth failures come back as 4xx with an `errors` payload.
            if let Ok(resp) = serde_json::from_slice::<GraphqlResponse>(&raw) {
                if resp.errors.as_ref().is_some_and(|e| !e.is_null()) {
                    return resp.into_page();
                }
            }
            return Err(FetchError::Http {
                status,
                body: snippet(&raw),
            });
        }

        let resp: GraphqlResponse = serde_json::from_slice(&raw)?;
        resp.into_page()
    }
}

impl PageSource for GraphqlClient {
    fn fetch_page(&mut self, cursor: Option<&str>) -> Result<FilesPage, FetchError> {
        self.fetch_files_page(cursor)
    }
}

fn snippet(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.len() <= ERROR_BODY_LIMIT {
        return text.to_string();
    }
    let mut take = ERROR_BODY_LIMIT;
    while !text.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}...", &text[..take])
}
