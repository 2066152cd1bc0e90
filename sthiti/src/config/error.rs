//! Configuration loading errors.

use thiserror::Error;

/// Errors that can occur when loading a [`LocalizationConfig`](super::LocalizationConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
