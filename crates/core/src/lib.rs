//! Memory Bridge Core
//!
//! Leaf types for the Memory Bridge workspace. This crate has no dependency on
//! the runtime services (orchestrator, session, HTTP transport) and can be used
//! on its own to implement fetchers or observers.
//!
//! ## Module Organization
//!
//! - `error` - Error types (`CoreError`, `FetchError`, `SessionError`)
//! - `normalize` - Canonical query keys (`normalize_query`)
//! - `memory` - Search result item (`MemoryHit`)
//! - `fetcher` - Injected transport abstraction (`SearchFetcher`, `FnFetcher`)
//! - `events` - Lifecycle hooks (`QueryObserver`, `QueryEvent`, `ChannelObserver`)

pub mod error;
pub mod events;
pub mod fetcher;
pub mod memory;
pub mod normalize;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult, FetchError, FetchResult, SessionError};

// ── Lifecycle Events ───────────────────────────────────────────────────
pub use events::{ChannelObserver, NoopObserver, QueryEvent, QueryObserver, SuccessMeta};

// ── Transport ──────────────────────────────────────────────────────────
pub use fetcher::{FnFetcher, SearchFetcher};

// ── Data ───────────────────────────────────────────────────────────────
pub use memory::MemoryHit;
pub use normalize::{normalize_query, query_len};
