//! Sequential batch runner: read every row, fetch every good row's asset.
//!
//! Nothing a single row does can stop the batch. Rows that failed
//! normalization and fetches that failed are handed to the caller's hooks
//! and the loop moves on to the next row. A row that only failed on a
//! numeric column still has a good URL and is fetched like any other.

mod failure;

pub use failure::{BatchFailure, BatchFailureKind};

use crate::fetcher::{FetchedAsset, Fetcher};
use crate::rows::{read_rows, ReadError, RowOutcome};
use std::path::Path;

/// Callbacks invoked while a batch runs.
pub trait BatchHooks {
    /// The asset of row `index` is present locally (downloaded or already cached).
    fn on_fetched(&mut self, _index: usize, _url: &str, _asset: &FetchedAsset) {}

    /// A row was skipped because of `failure`.
    fn on_failure(&mut self, failure: BatchFailure);
}

/// Adapts a plain failure closure to [`BatchHooks`].
pub struct OnFailure<F>(pub F);

impl<F: FnMut(BatchFailure)> BatchHooks for OnFailure<F> {
    fn on_failure(&mut self, failure: BatchFailure) {
        (self.0)(failure)
    }
}

/// Runs the batch for the CSV at `path`, reporting each failure to `on_failure`.
///
/// Returns `Err` only when the file itself cannot be read.
pub fn run<F>(path: &Path, fetcher: &Fetcher, on_failure: F) -> Result<(), ReadError>
where
    F: FnMut(BatchFailure),
{
    run_with(path, fetcher, &mut OnFailure(on_failure))
}

/// Runs the batch for the CSV at `path` with full hooks.
pub fn run_with<H: BatchHooks>(path: &Path, fetcher: &Fetcher, hooks: &mut H) -> Result<(), ReadError> {
    let rows = read_rows(path)?;
    tracing::info!("processing {} rows from {}", rows.len(), path.display());
    run_rows(rows, fetcher, hooks);
    Ok(())
}

/// Fetches the asset of every row with a usable URL, in order.
pub fn run_rows<H: BatchHooks>(rows: Vec<RowOutcome>, fetcher: &Fetcher, hooks: &mut H) {
    for row in rows {
        match row {
            RowOutcome::Ok(record) => fetch_row(record.index, &record.url, fetcher, hooks),
            RowOutcome::Failed(failed) => match failed.fetchable_url() {
                Some(url) => {
                    tracing::debug!("row {}: {}; fetching anyway", failed.index, failed.error);
                    fetch_row(failed.index, url, fetcher, hooks);
                }
                None => hooks.on_failure(BatchFailure::from_failed_row(failed)),
            },
        }
    }
}

fn fetch_row<H: BatchHooks>(index: usize, url: &str, fetcher: &Fetcher, hooks: &mut H) {
    match fetcher.fetch(url) {
        Ok(asset) => hooks.on_fetched(index, url, &asset),
        Err(err) => {
            tracing::warn!("row {}: {}", index, err);
            hooks.on_failure(BatchFailure {
                index,
                url: Some(url.to_string()),
                kind: BatchFailureKind::Fetch(err),
            });
        }
    }
}
