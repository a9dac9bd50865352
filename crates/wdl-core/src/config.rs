use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per download (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/wdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WdlConfig {
    /// Parallel workers for the batch download stage.
    pub workers: usize,
    /// Politeness delay between HTTP requests, in milliseconds (0 = none).
    pub throttle_ms: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Optional override of the extensions treated as crawlable pages
    /// rather than terminal files; built-in html-family set if missing.
    #[serde(default)]
    pub page_extensions: Option<Vec<String>>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for WdlConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            throttle_ms: 1000,
            user_agent: format!("wdl/{}", env!("CARGO_PKG_VERSION")),
            page_extensions: None,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
