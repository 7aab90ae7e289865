//! URL cleanup and filename derivation.
//!
//! Turns raw spreadsheet cells into fetchable URLs and maps every URL to a
//! stable local filename, so the same remote asset always lands on the same
//! path no matter when or in which order it is fetched.

mod clean;
mod path;

pub use clean::clean_url;
pub use path::{extension_from_url, filename_stem, DEFAULT_EXTENSION, IMAGE_EXTENSIONS};

/// Derives the local filename (stem + extension) for `url`.
///
/// The result is a pure function of the input string.
///
/// # Examples
///
/// - `derive_filename("https://example.com/pic.PNG?x=1")` → `"example_com_pic_png_x_1.png"`
/// - `derive_filename("https://example.com/avatar")` → `"example_com_avatar.jpg"`
pub fn derive_filename(url: &str) -> String {
    format!("{}.{}", filename_stem(url), extension_from_url(url))
}
