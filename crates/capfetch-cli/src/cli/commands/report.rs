//! Console notices for batch progress.

use capfetch_core::batch::{BatchFailure, BatchHooks};
use capfetch_core::fetcher::{FetchStatus, FetchedAsset};

/// Prints one line per fetched asset to stdout and one per failure to stderr.
pub struct ConsoleReport;

impl BatchHooks for ConsoleReport {
    fn on_fetched(&mut self, _index: usize, url: &str, asset: &FetchedAsset) {
        let name = asset
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match asset.status {
            FetchStatus::Cached => println!("{name} already exists."),
            FetchStatus::Downloaded { bytes } => {
                println!("Downloaded {url} to {name} ({bytes} bytes)")
            }
        }
    }

    fn on_failure(&mut self, failure: BatchFailure) {
        eprintln!("{failure}");
    }
}
