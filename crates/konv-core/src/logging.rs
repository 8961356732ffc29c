//! Logging init: append to a file under the XDG state dir, or fall back to stderr.
//!
//! The filter comes from `KONV_LOG` (EnvFilter syntax), else `RUST_LOG`, else
//! [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,konv=debug,konv_core=debug";
const LOG_ENV: &str = "KONV_LOG";
const LOG_FILE: &str = "konv.log";

/// Where `init_logging` writes: `~/.local/state/konv/konv.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("konv")?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file: {}", path.display()))
}

/// Install the file subscriber. Returns the log path.
/// On failure (e.g. state dir unwritable) returns Err so the caller can use [`init_logging_stderr`].
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path)?;

    // Mutex<File> is a MakeWriter: one locked handle shared by every event.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))?;

    tracing::info!(pid = std::process::id(), "konv logging to {}", path.display());
    Ok(path)
}

/// Stderr-only subscriber. Does nothing if one is already installed.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
