//! Paginator/collector: walks the files listing cursor by cursor.
//!
//! Each page's URLs are appended in server order. The loop ends when the
//! server reports no further pages, or on the first error, in which case the
//! records gathered so far are kept and the error is returned alongside them.

use serde::Serialize;

use crate::graphql::{FetchError, FilesPage};
use crate::url_model::derive_filename;

/// Anything that can serve pages of the files listing.
pub trait PageSource {
    /// Fetch the page after `cursor` (`None` = first page).
    fn fetch_page(&mut self, cursor: Option<&str>) -> Result<FilesPage, FetchError>;
}

/// One collected file: its URL and the local filename derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub filename: String,
    pub url: String,
}

impl FileRecord {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            filename: derive_filename(&url),
            url,
        }
    }
}

/// Reported after every page that was fetched successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 1-based page number.
    pub page: usize,
    /// Records added from this page.
    pub page_items: usize,
    /// Records collected so far.
    pub total: usize,
}

/// Result of a collection run.
#[derive(Debug)]
pub struct Collection {
    pub records: Vec<FileRecord>,
    /// Pages fetched successfully.
    pub pages: usize,
    /// Error that stopped collection before the last page, if any.
    pub interrupted: Option<FetchError>,
}

impl Collection {
    /// True if the server reported the last page.
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collect every file record from `source`, calling `on_page` after each page.
pub fn collect_files<S, F>(source: &mut S, on_page: F) -> Collection
where
    S: PageSource + ?Sized,
    F: FnMut(&PageProgress),
{
    collect_files_with(source, |_| {}, on_page)
}

/// As `collect_files`, also calling `before_fetch` with the 1-based page
/// number right before each request.
pub fn collect_files_with<S, B, F>(source: &mut S, mut before_fetch: B, mut on_page: F) -> Collection
where
    S: PageSource + ?Sized,
    B: FnMut(usize),
    F: FnMut(&PageProgress),
{
    let mut records: Vec<FileRecord> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        tracing::debug!(
            page = pages + 1,
            cursor = cursor.as_deref().unwrap_or("<start>"),
            "fetching files page"
        );
        before_fetch(pages + 1);
        let page = match source.fetch_page(cursor.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    page = pages + 1,
                    collected = records.len(),
                    "files listing stopped early: {}",
                    e
                );
                return Collection {
                    records,
                    pages,
                    interrupted: Some(e),
                };
            }
        };
        pages += 1;

        let page_items = page.urls.len();
        records.extend(page.urls.into_iter().map(FileRecord::from_url));
        on_page(&PageProgress {
            page: pages,
            page_items,
            total: records.len(),
        });

        if !page.has_next_page {
            break;
        }
        match page.end_cursor {
            Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                cursor = Some(next);
            }
            _ => {
                tracing::warn!(page = pages, "hasNextPage without a new endCursor");
                return Collection {
                    records,
                    pages,
                    interrupted: Some(FetchError::StalledCursor),
                };
            }
        }
    }

    tracing::info!(pages, files = records.len(), "files listing complete");
    Collection {
        records,
        pages,
        interrupted: None,
    }
}
