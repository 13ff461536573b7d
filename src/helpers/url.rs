//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone in a path segment or query value
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Encode a slug for use in a URL path segment or query value
pub fn encode_url(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Join a site base URL and a path without doubling slashes
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/blog/a") // -> "https://example.com/blog/a"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
