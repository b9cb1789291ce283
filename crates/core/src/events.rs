//! Query Lifecycle Events
//!
//! The orchestrator reports each dispatch through four lifecycle hooks:
//! started, succeeded, failed, finished. They are exposed two ways:
//!
//! - `QueryObserver` - a trait with one no-op default method per hook
//! - `QueryEvent` - a sum type carrying the same information, for consumers
//!   that prefer a channel (`ChannelObserver`)
//!
//! Hooks are invoked synchronously from the orchestrator's own control flow,
//! never from inside the fetcher, and never while orchestrator state is locked.
//! An observer may therefore call back into the orchestrator.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::FetchError;
use crate::memory::MemoryHit;

/// Extra information delivered with a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuccessMeta {
    /// The result was served from the cache rather than a fresh fetch
    pub from_cache: bool,
}

/// One lifecycle notification for a normalized query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryEvent {
    /// A fetch was dispatched
    Started { query: String },

    /// Results are available, either cached or fresh
    Succeeded {
        query: String,
        items: Vec<MemoryHit>,
        from_cache: bool,
    },

    /// The fetch failed for a reason other than cancellation
    Failed { query: String, error: FetchError },

    /// The attempt is over and the orchestrator is idle again
    Finished { query: String },
}

impl QueryEvent {
    /// The normalized query this event belongs to.
    pub fn query(&self) -> &str {
        match self {
            Self::Started { query }
            | Self::Succeeded { query, .. }
            | Self::Failed { query, .. }
            | Self::Finished { query } => query,
        }
    }
}

/// Receiver of orchestrator lifecycle hooks.
///
/// Every method defaults to a no-op so implementors only override what they
/// need. `on_event` routes a `QueryEvent` to the matching hook.
pub trait QueryObserver: Send + Sync {
    fn on_start(&self, _query: &str) {}

    fn on_success(&self, _query: &str, _items: &[MemoryHit], _meta: SuccessMeta) {}

    fn on_error(&self, _query: &str, _error: &FetchError) {}

    fn on_finally(&self, _query: &str) {}

    /// Dispatch an event to the matching hook.
    fn on_event(&self, event: &QueryEvent) {
        match event {
            QueryEvent::Started { query } => self.on_start(query),
            QueryEvent::Succeeded {
                query,
                items,
                from_cache,
            } => self.on_success(
                query,
                items,
                SuccessMeta {
                    from_cache: *from_cache,
                },
            ),
            QueryEvent::Failed { query, error } => self.on_error(query, error),
            QueryEvent::Finished { query } => self.on_finally(query),
        }
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {}

/// Observer that forwards every event into an unbounded channel.
///
/// Sends never block the orchestrator; events are dropped once the receiver
/// is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<QueryEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<QueryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl QueryObserver for ChannelObserver {
    fn on_event(&self, event: &QueryEvent) {
        let _ = self.tx.send(event.clone());
    }
}
