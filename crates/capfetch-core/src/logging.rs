//! Tracing setup for the `capfetch` binary.
//!
//! Logs go to an append-only file in the XDG state dir. Progress notices for
//! the user are printed by the CLI and never pass through here.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,capfetch=debug,capfetch_core=debug";

const LOG_FILE_NAME: &str = "capfetch.log";

/// `RUST_LOG` when set and valid, otherwise [`DEFAULT_FILTER`].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/capfetch/capfetch.log`, creating the directory.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("capfetch")?;
    xdg_dirs
        .place_state_file(LOG_FILE_NAME)
        .context("cannot create log directory")
}

/// Installs the global subscriber writing to [`log_file_path`].
///
/// Returns `Err` when the file cannot be opened or a subscriber is already
/// set; the CLI then calls [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("capfetch logging to {}", path.display());
    Ok(())
}

/// Same subscriber on stderr.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
