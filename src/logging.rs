// Diagnostic logging to a file; the terminal belongs to the UI

use crate::error::{BrowserError, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log file used when `RUST_LOG` is set but no `--log-file` was given
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("imgbrowse").join("imgbrowse.log"))
}

/// Where logs should go, if anywhere: the explicit path, or the default one when `RUST_LOG` is set
fn resolve_log_path(log_file: Option<&Path>, rust_log_set: bool) -> Option<PathBuf> {
    match log_file {
        Some(path) => Some(path.to_path_buf()),
        None if rust_log_set => default_log_path(),
        None => None,
    }
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Returns `false` when logging stays disabled.
pub fn init_logging(log_file: Option<&Path>) -> Result<bool> {
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    let Some(path) = resolve_log_path(log_file, rust_log_set) else {
        return Ok(false);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(build_filter())
        .try_init()
        .map_err(|e| BrowserError::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(true)
}
