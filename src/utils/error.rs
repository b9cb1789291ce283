//! Application Errors
//!
//! `AppError` covers config storage, HTTP client setup and errors bubbled
//! up from the core crate.

use memory_bridge_core::CoreError;
use thiserror::Error;

/// Error type for the application crate
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// A config value failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Errors raised by the core crate (builders)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result alias used across the application crate
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Convert AppError to a string for display at the edges
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
