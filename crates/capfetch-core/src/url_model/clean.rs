//! Cleanup of URLs pasted into spreadsheet cells.

use regex::Regex;
use std::sync::OnceLock;

/// BBCode closing tags left behind when URLs are copied out of forum posts.
const BBCODE_REMNANTS: [&str; 2] = ["[/img]", "[/url]"];

/// A run of straight or curly quotes at the end of the cell, optionally
/// followed by a space and trailing caption text (`"url" (caption)`).
fn trailing_quote_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r#"["’”']+(?: .*)?$"#).expect("invalid regex"))
}

fn strip_bbcode(url: &str) -> String {
    BBCODE_REMNANTS
        .iter()
        .fold(url.to_string(), |acc, tag| acc.replace(tag, ""))
}

/// Normalizes a raw URL cell into something an HTTP client can fetch.
///
/// - Scheme-relative `//host/path` becomes `https://host/path`
/// - Leading/trailing whitespace is trimmed
/// - A trailing quote run and any text after it is dropped; this also eats a
///   legitimate trailing quote in a query value (known limitation)
/// - `[/img]` and `[/url]` are removed wherever they occur
///
/// Never fails; the result may still not be a valid URL.
pub fn clean_url(raw: &str) -> String {
    let url = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };

    let without_quotes = trailing_quote_re().replace(url.trim(), "");
    let stripped = strip_bbcode(&without_quotes);
    strip_bbcode(stripped.trim())
}
