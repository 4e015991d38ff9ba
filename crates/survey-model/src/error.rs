use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a cleaning configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
