//! Query Orchestration
//!
//! Debounced, single-flight, cached search dispatch for one input stream, and
//! an awaitable session on top of it.
//!
//! ## Module Structure
//!
//! - `cache` - Lazily-expiring result cache keyed by normalized query
//! - `orchestrator` - `QueryOrchestrator`: debounce, single-flight, sequence-checked completion
//! - `session` - `SearchSession`: one pending explicit wait, newest wins, with timeout
//! - `bridge` - `SearchBridge`: an orchestrator and session wired together

pub mod bridge;
pub mod cache;
pub mod orchestrator;
pub mod session;

pub use bridge::{SearchBridge, SearchBridgeBuilder};
pub use cache::{CacheEntry, QueryCache};
pub use orchestrator::{QueryOrchestrator, QueryOrchestratorBuilder};
pub use session::{SearchSession, SessionOptions};
