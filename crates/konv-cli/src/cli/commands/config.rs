//! `konv config` – show where the config lives and what is in effect.

use anyhow::Result;
use konv_core::config::{self, KonvConfig};
use konv_core::logging;

pub fn run_config(cfg: &KonvConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    if let Ok(log) = logging::log_file_path() {
        println!("# log file: {}", log.display());
    }
    if cfg.estimator.is_none() {
        println!("# [estimator] not set, using built-in defaults");
    }
    Ok(())
}
