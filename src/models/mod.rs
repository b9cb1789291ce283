//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod options;
pub mod settings;
pub mod snapshot;

pub use options::*;
pub use settings::*;
pub use snapshot::*;
