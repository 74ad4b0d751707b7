//! Filename extraction from URL path.

/// Extracts the final path segment of a URL for use as a filename hint.
///
/// Query string and fragment are ignored and percent-encoding is kept as is.
/// Returns `None` when the path is empty or ends in `/`. Unparseable input
/// falls back to the text after the last `/`.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed.path_segments()?.last()?.to_string(),
        Err(_) => {
            let tail = url.rsplit('/').next().unwrap_or(url);
            tail.split(|c: char| c == '?' || c == '#').next().unwrap_or("").to_string()
        }
    };
    if segment.is_empty() {
        return None;
    }
    Some(segment)
}
