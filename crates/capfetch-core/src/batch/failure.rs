//! Per-row failure reported by the batch runner and the annotation pass.

use crate::annotate::{InferenceError, Step};
use crate::fetcher::FetchError;
use crate::rows::{FailedRow, RowError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchFailureKind {
    #[error(transparent)]
    Row(RowError),

    #[error(transparent)]
    Fetch(FetchError),

    #[error("{step} failed: {source}")]
    Inference {
        step: Step,
        #[source]
        source: InferenceError,
    },
}

/// One skipped row.
#[derive(Debug)]
pub struct BatchFailure {
    /// 0-based row position in the input.
    pub index: usize,
    /// Cleaned URL of the row, `None` when it had no url column.
    pub url: Option<String>,
    pub kind: BatchFailureKind,
}

impl BatchFailure {
    /// Failure for a row that never got past normalization.
    pub fn from_failed_row(failed: FailedRow) -> Self {
        Self {
            index: failed.index,
            url: failed.url,
            kind: BatchFailureKind::Row(failed.error),
        }
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "Failed to process {} (row {}): {}", url, self.index, self.kind),
            None => write!(f, "Failed to process row {}: {}", self.index, self.kind),
        }
    }
}
