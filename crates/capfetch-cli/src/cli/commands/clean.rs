//! `capfetch clean <url>` – show the cleaned URL.

use capfetch_core::url_model::clean_url;

pub fn run_clean(url: &str) {
    println!("{}", clean_url(url));
}
