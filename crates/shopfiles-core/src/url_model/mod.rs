//! URL modeling and filename derivation.
//!
//! Derives safe local filenames from the final segment of a file URL.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Filename used when the URL path yields nothing usable.
pub const FALLBACK_FILENAME: &str = "unknown_file";

/// Derives a safe filename for saving the file behind `url`.
///
/// Takes the last path segment of `url` and sanitizes it. Empty results and
/// the reserved names `.` and `..` are replaced by [`FALLBACK_FILENAME`].
///
/// # Examples
///
/// - `derive_filename("https://cdn.shopify.com/files/hero.jpg?v=1")` → `"hero.jpg"`
/// - `derive_filename("https://cdn.shopify.com/")` → `"unknown_file"`
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return FALLBACK_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}
