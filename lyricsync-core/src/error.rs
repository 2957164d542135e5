use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Sync errors
    #[error("Line index {index} is out of range for a document of {len} line(s)")]
    OutOfRange { index: usize, len: usize },

    #[error("Position feed closed")]
    SessionClosed,

    // Configuration errors
    #[error("Config file not found at {path}. A template has been created there.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
