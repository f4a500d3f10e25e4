//! Cleanup of raw version text.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\n\f\r ]+").unwrap());

/// Post-process raw version text: every `filter` match becomes `.`, carriage
/// returns are dropped, and all ASCII whitespace is removed. Other spacing
/// characters such as U+00A0 are kept.
pub fn normalize(raw: &[u8], filter: Option<&Regex>) -> String {
    let filtered = match filter {
        Some(filter) => filter.replace_all(raw, &b"."[..]).into_owned(),
        None => raw.to_vec(),
    };
    let without_cr: Vec<u8> = filtered.into_iter().filter(|&b| b != b'\r').collect();
    let compact = WHITESPACE_RE.replace_all(&without_cr, &b""[..]);
    String::from_utf8_lossy(&compact).into_owned()
}

/// First line of `content` that is not entirely whitespace, verbatim.
pub fn first_non_blank_line(content: &[u8]) -> Option<&[u8]> {
    content
        .split(|&b| b == b'\n')
        .find(|line| !line.iter().all(u8::is_ascii_whitespace))
}
