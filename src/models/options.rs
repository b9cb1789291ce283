//! Query Orchestration Options
//!
//! Tunables for `QueryOrchestrator` and the partial update type used to
//! hot-swap them at runtime.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default minimum normalized query length, in characters
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Default quiet period between `set_text` and dispatch
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Default validity window of cached results
pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;

/// Orchestrator tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Normalized queries shorter than this never dispatch
    pub min_length: usize,
    /// Delay between the last `set_text` and dispatch
    pub debounce_ms: u64,
    /// Validity window of cached results (milliseconds)
    pub cache_ttl_ms: u64,
    /// Disable to always bypass the cache
    pub use_cache: bool,
    /// Also refetch in the background after reporting a cache hit
    pub refresh_on_cache: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            use_cache: true,
            refresh_on_cache: false,
        }
    }
}

impl QueryOptions {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Apply a partial update to the options
    pub fn apply_update(&mut self, update: OptionsUpdate) {
        if let Some(min_length) = update.min_length {
            self.min_length = min_length;
        }
        if let Some(debounce_ms) = update.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if let Some(cache_ttl_ms) = update.cache_ttl_ms {
            self.cache_ttl_ms = cache_ttl_ms;
        }
        if let Some(use_cache) = update.use_cache {
            self.use_cache = use_cache;
        }
        if let Some(refresh_on_cache) = update.refresh_on_cache {
            self.refresh_on_cache = refresh_on_cache;
        }
    }
}

/// Options update request (partial update)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsUpdate {
    pub min_length: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub cache_ttl_ms: Option<u64>,
    pub use_cache: Option<bool>,
    pub refresh_on_cache: Option<bool>,
}
