//! Error types for droidtail
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for droidtail
#[derive(Error, Debug)]
pub enum DroidtailError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for droidtail operations
pub type Result<T> = std::result::Result<T, DroidtailError>;
