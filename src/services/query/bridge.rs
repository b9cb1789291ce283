//! Search Bridge
//!
//! One orchestrator plus one search session for a single input stream (one
//! per site integration). The session is registered as an observer next to
//! the caller's own observers, so both the UI and explicit waiters see every
//! accepted result.

use std::sync::Arc;
use std::time::Duration;

use memory_bridge_core::{CoreResult, MemoryHit, QueryObserver, SearchFetcher, SessionError};

use super::orchestrator::QueryOrchestrator;
use super::session::{SearchSession, SessionOptions};
use crate::models::options::{OptionsUpdate, QueryOptions};
use crate::models::settings::BridgeConfig;
use crate::models::snapshot::QuerySnapshot;

/// Orchestrator and session wired together.
#[derive(Clone)]
pub struct SearchBridge {
    orchestrator: QueryOrchestrator,
    session: Arc<SearchSession>,
}

impl SearchBridge {
    pub fn builder(fetcher: Arc<dyn SearchFetcher>) -> SearchBridgeBuilder {
        SearchBridgeBuilder::new(fetcher)
    }

    /// Typing path: record text and debounce.
    pub fn set_text(&self, raw: &str) {
        self.orchestrator.set_text(raw);
    }

    /// Explicit path: dispatch now and wait for this exact query's outcome.
    pub async fn search_and_wait(
        &self,
        raw: &str,
        timeout: Option<Duration>,
    ) -> Result<Vec<MemoryHit>, SessionError> {
        self.session
            .run_search_and_wait(&self.orchestrator, raw, timeout)
            .await
    }

    pub fn cancel(&self) {
        self.orchestrator.cancel();
    }

    pub fn clear_cache(&self) {
        self.orchestrator.clear_cache();
    }

    pub fn set_options(&self, update: OptionsUpdate) {
        self.orchestrator.set_options(update);
    }

    pub fn get_state(&self) -> QuerySnapshot {
        self.orchestrator.get_state()
    }

    pub fn orchestrator(&self) -> &QueryOrchestrator {
        &self.orchestrator
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }
}

/// Builder for `SearchBridge`.
pub struct SearchBridgeBuilder {
    fetcher: Arc<dyn SearchFetcher>,
    options: QueryOptions,
    session_options: SessionOptions,
    observers: Vec<Arc<dyn QueryObserver>>,
}

impl SearchBridgeBuilder {
    pub fn new(fetcher: Arc<dyn SearchFetcher>) -> Self {
        Self {
            fetcher,
            options: QueryOptions::default(),
            session_options: SessionOptions::default(),
            observers: Vec::new(),
        }
    }

    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session_options(mut self, session_options: SessionOptions) -> Self {
        self.session_options = session_options;
        self
    }

    /// Take tunables and the session timeout from a loaded configuration.
    pub fn config(mut self, config: &BridgeConfig) -> Self {
        self.options = config.query.clone();
        self.session_options = self
            .session_options
            .with_default_timeout(Duration::from_millis(config.session.default_timeout_ms));
        self
    }

    /// Register a UI observer; it is notified before the session.
    pub fn observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> CoreResult<SearchBridge> {
        let session = Arc::new(SearchSession::new(self.session_options));

        let mut builder = QueryOrchestrator::builder(self.fetcher)
            .normalizer(self.session_options.normalize_query)
            .options(self.options);
        for observer in self.observers {
            builder = builder.observer(observer);
        }
        let orchestrator = builder
            .observer(Arc::clone(&session) as Arc<dyn QueryObserver>)
            .build()?;

        Ok(SearchBridge {
            orchestrator,
            session,
        })
    }
}
