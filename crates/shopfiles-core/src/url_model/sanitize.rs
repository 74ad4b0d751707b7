//! Filesystem-safe filename sanitization.

/// Longest name accepted by common filesystems, in bytes.
const NAME_MAX: usize = 255;

/// True for characters rejected by Windows, macOS or Linux filesystems.
fn is_illegal(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Sanitizes a candidate filename for use on common filesystems.
///
/// - Replaces `< > : " / \ | ? *` and control characters with `_`
/// - Limits length to 255 bytes, cutting on a char boundary
///
/// Idempotent: a sanitized name passes through unchanged.
pub fn sanitize_filename(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if is_illegal(c) { '_' } else { c })
        .collect();

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out[..take].to_string()
    } else {
        out
    }
}
