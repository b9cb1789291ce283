//! Services
//!
//! Query orchestration and the memory search backend it dispatches to.

pub mod memory_api;
pub mod query;

pub use memory_api::MemoryApiClient;
pub use query::{QueryOrchestrator, SearchBridge, SearchSession, SessionOptions};
