//! Error types for djmix-engine
//!
//! Three families of failure exist:
//! - invalid input (empty track list, unknown file type, malformed values),
//!   rejected before anything is written
//! - degenerate analysis (non-positive loop length, empty fade window,
//!   silent buffer), handled by fallbacks and never surfaced here
//! - upstream failures in decode, stretch, resample or encode, propagated
//!   unchanged to the caller

use thiserror::Error;

/// Main error type for djmix-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Audio decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Output encoding errors
    #[error("Audio encode error: {0}")]
    Encode(String),

    /// Time-stretch primitive failures
    #[error("Time-stretch error: {0}")]
    Stretch(String),

    /// Sample rate conversion failures
    #[error("Resample error: {0}")]
    Resample(String),

    /// Analyzer failures (missing sidecar, rejected analysis)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from djmix-common (configuration, parsing)
    #[error(transparent)]
    Common(djmix_common::Error),
}

impl From<djmix_common::Error> for Error {
    fn from(err: djmix_common::Error) -> Self {
        match err {
            djmix_common::Error::InvalidInput(msg) => Error::InvalidInput(msg),
            djmix_common::Error::Io(e) => Error::Io(e),
            other => Error::Common(other),
        }
    }
}

/// Convenience Result type using djmix-engine Error
pub type Result<T> = std::result::Result<T, Error>;
