//! Search Session
//!
//! Adapts the callback-driven orchestrator into a one-shot awaitable: "give me
//! the current best-effort result for exactly this text".
//!
//! - At most one explicit wait is pending; a newer wait rejects the older one
//!   with `SessionError::Superseded`.
//! - Each wait has its own timeout (`SessionError::NoResult`).
//! - The latest completed (query, items) pair is staged so a repeated
//!   identical request resolves instantly without a new dispatch.
//!
//! The session settles waits only from its observer hooks, so it must be
//! registered as an observer on the orchestrator it drives (see `SearchBridge`).

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use memory_bridge_core::{
    normalize_query, FetchError, MemoryHit, QueryObserver, SessionError, SuccessMeta,
};
use tokio::sync::oneshot;
use tokio::time::Instant;

use super::orchestrator::QueryOrchestrator;
use crate::models::settings::DEFAULT_SESSION_TIMEOUT_MS;

type WaitResult = Result<Vec<MemoryHit>, SessionError>;

/// Construction options for `SearchSession`.
#[derive(Clone, Copy)]
pub struct SessionOptions {
    /// Normalizer used to key waits. `SearchBridge` hands the same function
    /// to its orchestrator.
    pub normalize_query: fn(&str) -> String,
    /// Timeout applied when `run_search_and_wait` is given none.
    pub default_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            normalize_query,
            default_timeout: Duration::from_millis(DEFAULT_SESSION_TIMEOUT_MS),
        }
    }
}

impl std::fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOptions")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionOptions {
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

struct PendingWait {
    id: u64,
    query: String,
    tx: oneshot::Sender<WaitResult>,
}

#[derive(Default)]
struct SessionState {
    pending: Option<PendingWait>,
    staged_query: Option<String>,
    staged_items: Vec<MemoryHit>,
    next_wait_id: u64,
}

/// One-shot awaitable view over a `QueryOrchestrator`.
pub struct SearchSession {
    options: SessionOptions,
    state: Mutex<SessionState>,
}

impl SearchSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Trigger an immediate dispatch for `raw_query` and wait for its outcome.
    ///
    /// Resolves instantly from the staged memo when the same normalized query
    /// last completed with a non-empty result. Otherwise any older pending wait
    /// is rejected as superseded, a new wait is registered, and the
    /// orchestrator is told to run now. The wait is registered before the
    /// dispatch so that a synchronous cache hit settles it immediately.
    pub async fn run_search_and_wait(
        &self,
        orchestrator: &QueryOrchestrator,
        raw_query: &str,
        timeout: Option<Duration>,
    ) -> WaitResult {
        let query = (self.options.normalize_query)(raw_query);
        let timeout = timeout.unwrap_or(self.options.default_timeout);
        let deadline = Instant::now() + timeout;

        let (wait_id, rx) = {
            let mut state = self.lock_state();

            if state.staged_query.as_deref() == Some(query.as_str())
                && !state.staged_items.is_empty()
            {
                tracing::debug!(query = %query, "Resolving from staged results");
                return Ok(state.staged_items.clone());
            }

            if let Some(older) = state.pending.take() {
                tracing::debug!(previous = %older.query, query = %query, "Superseding pending wait");
                let _ = older.tx.send(Err(SessionError::Superseded { query: older.query }));
            }

            state.next_wait_id += 1;
            let id = state.next_wait_id;
            let (tx, rx) = oneshot::channel();
            state.pending = Some(PendingWait {
                id,
                query: query.clone(),
                tx,
            });
            (id, rx)
        };

        orchestrator.run_immediate(Some(raw_query));

        match tokio::time::timeout_at(deadline, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(SessionError::Closed),
            Err(_) => {
                let mut state = self.lock_state();
                if state.pending.as_ref().is_some_and(|p| p.id == wait_id) {
                    state.pending = None;
                }
                tracing::debug!(query = %query, timeout_ms = timeout.as_millis() as u64, "Explicit search timed out");
                Err(SessionError::NoResult {
                    query,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    /// Record a completed result and settle a matching pending wait.
    pub fn record_success(&self, query: &str, items: &[MemoryHit]) {
        let mut state = self.lock_state();
        state.staged_query = Some(query.to_string());
        state.staged_items = items.to_vec();

        if state.pending.as_ref().is_some_and(|p| p.query == query) {
            if let Some(pending) = state.pending.take() {
                let _ = pending.tx.send(Ok(items.to_vec()));
            }
        }
    }

    /// Reject a matching pending wait and drop the staged memo.
    pub fn record_error(&self, query: &str, error: &FetchError) {
        let mut state = self.lock_state();
        if state.pending.as_ref().is_some_and(|p| p.query == query) {
            if let Some(pending) = state.pending.take() {
                let _ = pending.tx.send(Err(SessionError::Fetch {
                    query: query.to_string(),
                    source: error.clone(),
                }));
            }
        }
        state.staged_query = None;
        state.staged_items.clear();
    }

    /// The staged (query, items) pair, if any.
    pub fn staged(&self) -> Option<(String, Vec<MemoryHit>)> {
        let state = self.lock_state();
        state
            .staged_query
            .clone()
            .map(|query| (query, state.staged_items.clone()))
    }

    /// Normalized query of the pending wait, if any.
    pub fn pending_query(&self) -> Option<String> {
        self.lock_state().pending.as_ref().map(|p| p.query.clone())
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl QueryObserver for SearchSession {
    fn on_success(&self, query: &str, items: &[MemoryHit], _meta: SuccessMeta) {
        self.record_success(query, items);
    }

    fn on_error(&self, query: &str, error: &FetchError) {
        self.record_error(query, error);
    }
}
