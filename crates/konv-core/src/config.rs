use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::estimator::EstimatorConfig;
use crate::options::{Format, Quality};

/// Global configuration loaded from `~/.config/konv/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KonvConfig {
    /// Root URL of the conversion service (endpoints live under `api/`).
    pub service_url: String,
    /// Format used when `--format` is not given.
    #[serde(default)]
    pub default_format: Format,
    /// Quality preset used when `--quality` is not given.
    #[serde(default)]
    pub default_quality: Quality,
    /// Upper bound in seconds on one convert or bundle request.
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds for every request.
    pub connect_timeout_secs: u64,
    /// Interval between simulated progress steps while the service converts.
    pub estimator_tick_ms: u64,
    /// Optional estimator tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub estimator: Option<EstimatorConfig>,
}

impl Default for KonvConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8080".to_string(),
            default_format: Format::default(),
            default_quality: Quality::default(),
            request_timeout_secs: 600,
            connect_timeout_secs: 15,
            estimator_tick_ms: 300,
            estimator: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("konv")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KonvConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<KonvConfig> {
    if !path.exists() {
        let default_cfg = KonvConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: KonvConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
