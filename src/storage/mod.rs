//! Storage Layer
//!
//! Handles configuration persistence (JSON config file).

pub mod config;

pub use config::*;
