//! Asset fetch errors.

use std::path::PathBuf;
use thiserror::Error;

/// Error returned by [`super::Fetcher::fetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with something other than 200. Nothing was written.
    #[error("failed to download {url} to {filename} with status code {status}")]
    Status {
        url: String,
        filename: String,
        status: u32,
    },

    /// Curl reported an error (DNS, connection refused, timeout, bad URL...).
    #[error("failed to download {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Creating the data directory or writing the asset failed.
    #[error("cannot write {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// HTTP status for [`FetchError::Status`].
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { .. } | FetchError::Io { .. } => None,
        }
    }
}
