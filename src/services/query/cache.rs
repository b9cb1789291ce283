//! Query Result Cache
//!
//! Time-bounded cache of search results keyed by normalized query.
//!
//! - Expiry is lazy: checked only on lookup, no background sweep.
//! - The TTL is passed at lookup time, so `set_options` applies to stored entries.
//! - Timestamps use `tokio::time::Instant` and follow a paused test clock.
//! - The map is unbounded.

use std::collections::HashMap;
use std::time::Duration;

use memory_bridge_core::MemoryHit;
use tokio::time::Instant;

/// A cached result and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub timestamp: Instant,
    pub result: Vec<MemoryHit>,
}

impl CacheEntry {
    /// An entry is valid iff `now - timestamp <= ttl`.
    pub fn is_valid(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) <= ttl
    }
}

/// Lazily-expiring result cache.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a valid entry, evicting it if it has expired.
    pub fn get(&mut self, query: &str, ttl: Duration) -> Option<Vec<MemoryHit>> {
        let now = Instant::now();
        match self.entries.get(query) {
            Some(entry) if entry.is_valid(now, ttl) => Some(entry.result.clone()),
            Some(_) => {
                self.entries.remove(query);
                tracing::trace!(query = %query, "Evicted expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Store a fresh result, replacing any previous entry.
    pub fn insert(&mut self, query: impl Into<String>, result: Vec<MemoryHit>) {
        self.entries.insert(
            query.into(),
            CacheEntry {
                timestamp: Instant::now(),
                result,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
