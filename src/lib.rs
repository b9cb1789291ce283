//! Memory Bridge - Query Orchestration Library
//!
//! Turns a stream of partially-typed search text into a disciplined stream of
//! memory lookups. It includes:
//! - Query orchestration (debounce, single-flight, sequence-checked results, cache)
//! - An awaitable search session for explicit "search now" requests
//! - An HTTP fetcher for the memory search API
//! - Config storage and data models

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use memory_bridge_core::{
    normalize_query, FetchError, FetchResult, MemoryHit, QueryEvent, QueryObserver, SearchFetcher,
    SessionError, SuccessMeta,
};

pub use models::options::{OptionsUpdate, QueryOptions};
pub use models::settings::{BridgeConfig, SettingsUpdate};
pub use models::snapshot::QuerySnapshot;
pub use services::memory_api::MemoryApiClient;
pub use services::query::{QueryOrchestrator, SearchBridge, SearchSession, SessionOptions};
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
