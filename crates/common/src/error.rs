//! Common error types.

use thiserror::Error;

/// Main error type for the capture pipeline.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Caller resolution error: {0}")]
    CallerResolution(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Capture not allowed on {0}")]
    NotAllowed(String),
}

pub type TraceResult<T> = Result<T, TraceError>;

impl TraceError {
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn caller_resolution(msg: impl Into<String>) -> Self {
        Self::CallerResolution(msg.into())
    }

    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_allowed(msg: impl Into<String>) -> Self {
        Self::NotAllowed(msg.into())
    }
}
