//! Small helpers shared by adapters and the driver.
//!
//! - String cleanup for scraped text (whitespace, truncation for logs)
//! - URL resolution against a page's base URL
//! - JSON error classification for truncated bodies
//! - File system validation for output directories

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and a count of the dropped bytes appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits, otherwise the cut prefix with
/// `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Detect if a serde_json error indicates a truncated/incomplete body.
///
/// A response cut off mid-transfer fails to parse with an EOF error; this
/// lets [`crate::fetch::get_json`] say so in the decode error.
///
/// # Arguments
///
/// * `e` - The parse error to classify
///
/// # Returns
///
/// `true` if the error is an EOF error, `false` otherwise.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Collapse every run of whitespace (including newlines and NBSP) into one
/// space and trim both ends.
///
/// Scraped titles often carry indentation and line breaks from the markup.
pub fn collapse_whitespace(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve `href` against `base`, accepting absolute, root-relative and
/// relative references.
///
/// # Arguments
///
/// * `base` - Absolute URL of the page the link was found on
/// * `href` - The link as written in the page or API payload
///
/// # Returns
///
/// The absolute URL, or the parse error when `href` is malformed or a
/// relative `href` meets a `base` that is not an absolute URL.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     resolve_url("https://atcoder.jp/contests/", "/contests/abc353").unwrap(),
///     "https://atcoder.jp/contests/abc353"
/// );
/// ```
pub fn resolve_url(base: &str, href: &str) -> Result<String, url::ParseError> {
    match Url::parse(href) {
        Ok(absolute) => Ok(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Url::parse(base)?.join(href)?.to_string())
        }
        Err(e) => Err(e),
    }
}

/// Host (authority without port) of `url`, lowercased.
///
/// # Returns
///
/// `None` when `url` does not parse or has no host (e.g. `data:` URLs).
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and deletes a probe file.
///
/// # Arguments
///
/// * `path` - Directory path to validate
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
