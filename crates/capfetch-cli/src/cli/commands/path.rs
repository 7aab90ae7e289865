//! `capfetch path <url>` – show where a URL is stored.

use capfetch_core::fetcher::Fetcher;
use capfetch_core::url_model::clean_url;

pub fn run_path(fetcher: &Fetcher, url: &str, raw: bool) {
    let url = if raw { url.to_string() } else { clean_url(url) };
    println!("{}", fetcher.store().derive_path(&url).display());
}
