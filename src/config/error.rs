//! Failures while locating, reading or writing `config.yml`.

use std::path::PathBuf;

/// Reasons the taskboard configuration could not be used.
///
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `load` has not resolved a file yet
    #[error("Configuration file path not set")]
    FilePathNotSet,

    #[error("Failed to find home directory")]
    HomeDirectoryNotFound,

    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config directory or the file's parent could not be created
    #[error("Failed to create configuration directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializationFailed(String),

    /// YAML on disk does not match the expected keys
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationFailed(String),

    /// A key parsed but holds an unusable value, such as a bad `api_url`
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
