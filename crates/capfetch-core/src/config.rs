use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// HTTP settings for asset downloads (optional `[fetch]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Seconds to wait for the TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole download; 0 = no limit.
    pub timeout_secs: u64,
    /// Redirects followed per request; 0 disables following.
    pub max_redirections: u32,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 300,
            max_redirections: 10,
            user_agent: concat!("capfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// External inference commands (optional `[inference]` section).
///
/// Each entry is a program followed by its leading arguments; the image path
/// is appended as the last argument. A missing entry skips that step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub caption: Option<Vec<String>>,
    #[serde(default)]
    pub ocr: Option<Vec<String>>,
    #[serde(default)]
    pub ocr_qa: Option<Vec<String>>,
}

/// Global configuration loaded from `~/.config/capfetch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapfetchConfig {
    /// Directory holding fetched assets. Defaults to `~/.local/share/capfetch/images`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub inference: Option<InferenceConfig>,
}

impl CapfetchConfig {
    /// Configured data directory, or the XDG default.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("capfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

pub fn default_data_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("capfetch")?;
    Ok(xdg_dirs.get_data_home().join("images"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CapfetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<CapfetchConfig> {
    if !path.exists() {
        let default_cfg = CapfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: CapfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
