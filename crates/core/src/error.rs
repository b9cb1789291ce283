//! Core Error Types
//!
//! Defines the error types shared across the Memory Bridge workspace:
//!
//! - `CoreError` - construction failures
//! - `FetchError` - outcome of a single search attempt (cancellation vs. failure)
//! - `SessionError` - outcome of an explicit `run_search_and_wait` call
//!
//! These types only depend on thiserror and serde to keep the core
//! crate lightweight. The application crate wraps them in `AppError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Construction failure of a core component.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Missing runtime or unusable settings at build time
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

/// Failure of a single search attempt.
///
/// `Cancelled` is never surfaced to observers; every other variant is
/// reported exactly once through `on_error` for a non-superseded attempt.
/// Cloneable because one failure fans out to several observers.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// The attempt's cancellation token fired (superseded or torn down)
    #[error("Search request cancelled")]
    Cancelled,

    /// The search API answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport-level failure (DNS, connect, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded into search results
    #[error("Decode error: {0}")]
    Decode(String),

    /// Anything else the injected fetcher wants to report
    #[error("Search failed: {0}")]
    Other(String),
}

/// Result type alias for fetch attempts
pub type FetchResult<T> = Result<T, FetchError>;

impl FetchError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a generic failure
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error only signals cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Failure of an explicit, awaited search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A newer explicit wait displaced this one
    #[error("Search for '{query}' superseded by a newer request")]
    Superseded { query: String },

    /// No result arrived for the query before the wait timed out
    #[error("No result for '{query}' within {timeout_ms}ms")]
    NoResult { query: String, timeout_ms: u64 },

    /// The underlying fetch for this exact query failed
    #[error("Search for '{query}' failed: {source}")]
    Fetch {
        query: String,
        #[source]
        source: FetchError,
    },

    /// The session dropped the wait without settling it
    #[error("Search session closed")]
    Closed,
}

impl SessionError {
    /// Whether the caller was displaced by a newer wait.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// Whether the wait timed out without a result.
    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::NoResult { .. })
    }
}
