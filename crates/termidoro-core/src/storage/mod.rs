//! User config storage.

mod config;

pub use config::{Config, NotificationsConfig, TimerConfig, UiConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/termidoro[-dev]/` based on TERMIDORO_ENV, creating it
/// if needed.
///
/// Set TERMIDORO_ENV=dev to keep development settings apart.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TERMIDORO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("termidoro-dev")
    } else {
        base_dir.join("termidoro")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DirectoryUnavailable {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// `<data dir>/logs`, created on demand.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn log_dir() -> Result<PathBuf, ConfigError> {
    let dir = data_dir()?.join("logs");
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DirectoryUnavailable {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
