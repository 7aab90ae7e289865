//! Filename stem and extension derived from a URL string.

use regex::Regex;
use std::sync::OnceLock;

/// Maximum stem length in characters.
const STEM_MAX: usize = 120;

/// Extensions recognized at the end of a URL path.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Extension used when the URL does not end in a recognized image extension.
pub const DEFAULT_EXTENSION: &str = "jpg";

fn extension_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"(?i)\.(png|jpg|jpeg|gif|webp|svg)(?:\?|#|$)").expect("invalid regex")
    })
}

/// Builds the filename stem for `url`.
///
/// - Lowercases the URL and removes `https://`
/// - Replaces every run of characters outside `[a-z0-9]` with one `_`
/// - Truncates to 120 characters
///
/// Different URLs may share a stem after truncation; the first one fetched wins.
pub fn filename_stem(url: &str) -> String {
    let lowered = url.to_lowercase().replace("https://", "");

    let mut out = String::with_capacity(lowered.len());
    let mut prev_underscore = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    // Only ASCII survives the loop above, so byte truncation is char-safe.
    out.truncate(STEM_MAX);
    out
}

/// Returns the lowercase image extension found in `url`, or [`DEFAULT_EXTENSION`].
///
/// The extension must be followed by `?`, `#` or the end of the string;
/// matching is case-insensitive and looks at the whole URL, not only the path.
pub fn extension_from_url(url: &str) -> &'static str {
    extension_re()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| {
            IMAGE_EXTENSIONS
                .iter()
                .find(|ext| ext.eq_ignore_ascii_case(m.as_str()))
        })
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}
