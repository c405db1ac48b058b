//! URL extraction from incoming message text.
//!
//! Only scheme-prefixed `http://` / `https://` links are recognized; the match
//! runs until the first whitespace character.

// lazy_regex! validates the pattern at compile time
#![allow(clippy::non_std_lazy_statics)]

use lazy_regex::lazy_regex;

/// Match an http(s) URL: scheme followed by a non-whitespace run
static RE_URL: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"https?://[^\s]+");

/// Returns the leftmost `http(s)://` substring of `text`, if any.
///
/// # Examples
///
/// ```
/// use link_info_bot::links::extract_first_url;
///
/// let url = extract_first_url("check this out https://youtu.be/abc123 nice");
/// assert_eq!(url, Some("https://youtu.be/abc123"));
/// assert_eq!(extract_first_url("youtube.com/watch?v=1"), None);
/// ```
#[must_use]
pub fn extract_first_url(text: &str) -> Option<&str> {
    RE_URL.find(text).map(|m| m.as_str())
}
