//! Idempotent asset fetcher.
//!
//! `fetch(url)` makes sure a local copy of `url` exists at its derived path.
//! If the file is already there it is trusted and returned without touching
//! the network; otherwise one GET is made and the body is stored only when
//! the server answered 200. No retries.

mod error;
mod http;

pub use error::FetchError;

use crate::config::FetchConfig;
use crate::store::{self, AssetStore};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transfer settings for the GET.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit; `None` lets a stalled server hang the batch.
    pub timeout: Option<Duration>,
    /// 0 disables redirect following.
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        HttpOptions::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for HttpOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: (cfg.timeout_secs > 0).then(|| Duration::from_secs(cfg.timeout_secs)),
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// How a fetch was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The file was already on disk; no request was made.
    Cached,
    /// The file was downloaded now.
    Downloaded { bytes: u64 },
}

/// A local asset after a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    pub path: PathBuf,
    pub status: FetchStatus,
}

/// Fetches remote assets into an [`AssetStore`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    store: AssetStore,
    http: HttpOptions,
}

impl Fetcher {
    pub fn new(store: AssetStore, http: HttpOptions) -> Self {
        Self { store, http }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Ensures a local copy of `url` exists and returns its path.
    pub fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
        let path = self.store.derive_path(url);
        let filename = file_name(&path);

        store::ensure_parent_dir(&path).map_err(|source| FetchError::Io {
            path: path.parent().unwrap_or(&path).to_path_buf(),
            source,
        })?;

        if path.exists() {
            tracing::debug!("{} already exists", filename);
            return Ok(FetchedAsset {
                path,
                status: FetchStatus::Cached,
            });
        }

        tracing::info!("downloading {} to {}", url, filename);
        let response = http::get(url, &self.http).map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        if response.status != 200 {
            return Err(FetchError::Status {
                url: url.to_string(),
                filename,
                status: response.status,
            });
        }

        store::write_atomic(&path, &response.body).map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        })?;

        let bytes = response.body.len() as u64;
        tracing::debug!("wrote {} bytes to {}", bytes, path.display());
        Ok(FetchedAsset {
            path,
            status: FetchStatus::Downloaded { bytes },
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
