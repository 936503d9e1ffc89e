//! Core error types for termidoro-core.
//!
//! This module defines the error hierarchy using thiserror. Runtime failures
//! inside a running interval (drawing, notifications, prompt reads) are logged
//! and recovered locally; only setup problems surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for termidoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Duration parsing errors
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// Template lookup errors
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the config directory
    #[error("Failed to prepare config directory {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors produced while parsing a duration string such as `1h30m`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid duration format '{0}'")]
    InvalidFormat(String),

    #[error("Duration '{0}' is shorter than one second")]
    TooShort(String),
}

/// Errors produced by template lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template '{name}'")]
    Unknown {
        name: String,
        suggestion: Option<String>,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
