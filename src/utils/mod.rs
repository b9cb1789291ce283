//! Utilities
//!
//! Error types and config path helpers.

pub mod error;
pub mod paths;

pub use error::*;
pub use paths::*;
