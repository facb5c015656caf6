//! Common error types for djmix

use thiserror::Error;

/// Common result type for djmix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the engine and the CLI
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (malformed duration, bad analysis values, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Analysis sidecar could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
