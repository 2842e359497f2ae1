//! Error types for the audiolab library

use thiserror::Error;

/// Errors produced by the DSP core and its host adapters
#[derive(Error, Debug)]
pub enum AudioLabError {
    /// A caller passed a value outside the accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The host decoder could not turn bytes into a sample buffer
    #[error("decode failed: {0}")]
    Decode(String),

    /// Sample rate conversion failed during export
    #[error("resampling failed: {0}")]
    Resample(String),

    /// Writing a stem archive failed
    #[error("archive error: {0}")]
    Archive(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for audiolab operations
pub type Result<T> = std::result::Result<T, AudioLabError>;
