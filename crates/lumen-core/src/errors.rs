//! Error types for failure handling across the image studio core
//!
//! A single error hierarchy captures every failure mode in the generation
//! pipeline. Validation errors are raised before any network activity,
//! configuration errors surface missing credentials distinguishably (the
//! classifier depends on this), and upstream/codec errors carry the raw
//! message so the classifier can build a user-visible one.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum StudioError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl StudioError {
    /// The raw message carried by this error, without the category prefix.
    /// This is what the classifier inspects and concatenates.
    pub fn raw_message(&self) -> &str {
        match self {
            StudioError::Validation(m)
            | StudioError::Config(m)
            | StudioError::Upstream(m)
            | StudioError::Codec(m)
            | StudioError::Io(m) => m,
        }
    }
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        StudioError::Upstream(err.to_string())
    }
}
