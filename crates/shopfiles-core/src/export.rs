//! Tabular export of collected records.
//!
//! Writes `filename,url` rows as CSV (or the same records as JSON), replacing
//! any previous output. An empty record set writes nothing.

use anyhow::{Context, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::collector::FileRecord;
use crate::storage;

const CSV_HEADER: [&str; 2] = ["filename", "url"];
const CSV_LINE_END: &str = "\r\n";

/// Output format for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from the output file extension (`.json` → JSON, else CSV).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}' (expected csv or json)", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Result of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No records; no file was written.
    Empty,
    Written { path: PathBuf, rows: usize },
}

/// JSON document shape: `{"files": [...], "total": n}`.
#[derive(Debug, Serialize)]
pub struct FileList<'a> {
    pub files: &'a [FileRecord],
    pub total: usize,
}

impl<'a> FileList<'a> {
    pub fn new(files: &'a [FileRecord]) -> Self {
        Self {
            files,
            total: files.len(),
        }
    }
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\r' | '\n')) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Header plus one `filename,url` row per record, CRLF-terminated.
pub fn render_csv(records: &[FileRecord]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str(CSV_LINE_END);
    for r in records {
        out.push_str(&csv_field(&r.filename));
        out.push(',');
        out.push_str(&csv_field(&r.url));
        out.push_str(CSV_LINE_END);
    }
    out
}

pub fn render_json(records: &[FileRecord]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&FileList::new(records))?;
    out.push('\n');
    Ok(out)
}

/// Write `records` to `path` in `format`, replacing any existing file.
pub fn export_records(
    records: &[FileRecord],
    path: &Path,
    format: ExportFormat,
) -> Result<ExportOutcome> {
    if records.is_empty() {
        tracing::info!(path = %path.display(), "no records, export skipped");
        return Ok(ExportOutcome::Empty);
    }

    let body = match format {
        ExportFormat::Csv => render_csv(records),
        ExportFormat::Json => render_json(records)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    storage::write_atomic(path, body.as_bytes())
        .with_context(|| format!("write export {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = records.len(), %format, "export written");
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}
