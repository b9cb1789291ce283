//! Orchestrator State Snapshot
//!
//! Read-only view of the orchestrator's runtime state, for diagnostics and tests.

use memory_bridge_core::MemoryHit;
use serde::{Deserialize, Serialize};

use super::options::QueryOptions;

/// Snapshot returned by `QueryOrchestrator::get_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    /// Most recent raw text seen via `set_text` / `run_immediate`
    pub latest_text: String,
    /// Most recent query whose fresh (non-cached) fetch was accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed_query: Option<String>,
    /// Result of `last_completed_query`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<Vec<MemoryHit>>,
    /// Query of the single outstanding fetch, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_flight_query: Option<String>,
    /// Whether the outstanding fetch still holds a live cancellation token
    pub has_abort_handle: bool,
    /// Current dispatch sequence number
    pub sequence: u64,
    /// Whether a debounce timer is armed
    pub debounce_pending: bool,
    /// Number of entries in the result cache, expired ones included
    pub cache_entries: usize,
    /// Tunables currently in effect
    pub options: QueryOptions,
}

impl QuerySnapshot {
    /// Whether a fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight_query.is_some()
    }
}
