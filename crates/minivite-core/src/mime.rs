//! Content types by file extension.

use std::path::Path;

pub const JAVASCRIPT: &str = "application/javascript";
pub const HTML: &str = "text/html";
pub const PLAIN_TEXT: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension → content type. Anything not listed is served as `OCTET_STREAM`.
const MIME_TYPES: &[(&str, &str)] = &[
    ("html", HTML),
    ("js", JAVASCRIPT),
    ("css", "text/css"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
];

/// Content type for a file, by extension (case-insensitive).
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };

    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map_or(OCTET_STREAM, |&(_, mime)| mime)
}

/// Whether a content type denotes an HTML document (parameters ignored).
#[must_use]
pub fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(HTML))
}
