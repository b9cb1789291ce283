//! Query Orchestrator
//!
//! Turns a stream of rapidly-changing free text into a throttled,
//! de-duplicated, cacheable, cancellable sequence of search calls.
//!
//! ## Dispatch Flow
//!
//! 1. Normalize; drop empty or too-short queries
//! 2. Serve a valid cache entry (`on_success` with `from_cache = true`);
//!    stop unless `refresh_on_cache` is set
//! 3. Skip if the same query is already in flight (single-flight)
//! 4. Cancel the token of a different in-flight query
//! 5. Bump the sequence number, emit `on_start`, spawn the fetch
//! 6. On completion, accept the outcome only if its sequence number is still
//!    current; otherwise drop it silently
//!
//! ## Thread Safety
//!
//! All state lives behind one `std::sync::Mutex` that is never held across an
//! await point or while observers run. Events are queued in an outbox under
//! that lock, in the same critical section that accepts them, and a single
//! drainer at a time hands them to observers. Observers therefore see events
//! in decision order on any runtime flavor, and may call back into the
//! orchestrator. The orchestrator is `Clone` (shared `Arc` inside) and must be
//! built inside a Tokio runtime, whose handle it keeps for the debounce timer
//! and fetch tasks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use memory_bridge_core::{
    normalize_query, query_len, CoreError, CoreResult, FetchResult, MemoryHit, QueryEvent,
    QueryObserver, SearchFetcher,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::cache::QueryCache;
use crate::models::options::{OptionsUpdate, QueryOptions};
use crate::models::snapshot::QuerySnapshot;

/// The single outstanding fetch and its cancellation token.
struct InFlight {
    query: String,
    token: CancellationToken,
}

/// An armed debounce timer.
///
/// `generation` guards against a timer task that already woke up racing
/// with the call that replaced it.
struct DebounceTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct OrchestratorState {
    options: QueryOptions,
    latest_text: String,
    last_completed_query: Option<String>,
    last_result: Option<Vec<MemoryHit>>,
    in_flight: Option<InFlight>,
    sequence: u64,
    debounce: Option<DebounceTimer>,
    debounce_generation: u64,
    cache: QueryCache,
    /// Accepted events awaiting delivery, in decision order
    outbox: VecDeque<QueryEvent>,
    delivering: bool,
}

impl OrchestratorState {
    fn new(options: QueryOptions) -> Self {
        Self {
            options,
            latest_text: String::new(),
            last_completed_query: None,
            last_result: None,
            in_flight: None,
            sequence: 0,
            debounce: None,
            debounce_generation: 0,
            cache: QueryCache::new(),
            outbox: VecDeque::new(),
            delivering: false,
        }
    }

    fn clear_debounce(&mut self) {
        if let Some(timer) = self.debounce.take() {
            timer.handle.abort();
        }
    }

    fn is_dispatchable(&self, query: &str) -> bool {
        !query.is_empty() && query_len(query) >= self.options.min_length
    }
}

struct Inner {
    fetcher: Arc<dyn SearchFetcher>,
    normalize: fn(&str) -> String,
    observers: Vec<Arc<dyn QueryObserver>>,
    runtime: Handle,
    state: Mutex<OrchestratorState>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drain the outbox to observers in enqueue order.
    ///
    /// Only one caller drains at a time. A caller that finds delivery already
    /// running returns at once and leaves its events to the active drainer,
    /// which also covers observers that call back into the orchestrator.
    fn deliver(&self) {
        {
            let mut state = self.lock_state();
            if state.delivering || state.outbox.is_empty() {
                return;
            }
            state.delivering = true;
        }

        let mut guard = DeliveryGuard {
            inner: self,
            armed: true,
        };
        loop {
            let event = {
                let mut state = self.lock_state();
                match state.outbox.pop_front() {
                    Some(event) => event,
                    None => {
                        state.delivering = false;
                        guard.armed = false;
                        return;
                    }
                }
            };
            for observer in &self.observers {
                observer.on_event(&event);
            }
        }
    }
}

/// Releases the delivery slot if an observer panics mid-drain.
struct DeliveryGuard<'a> {
    inner: &'a Inner,
    armed: bool,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.lock_state().delivering = false;
        }
    }
}

/// Debounced, single-flight, cached search dispatcher for one input stream.
#[derive(Clone)]
pub struct QueryOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOrchestrator")
            .field("observers", &self.inner.observers.len())
            .finish_non_exhaustive()
    }
}

impl QueryOrchestrator {
    /// Start building an orchestrator around a fetcher.
    pub fn builder(fetcher: Arc<dyn SearchFetcher>) -> QueryOrchestratorBuilder {
        QueryOrchestratorBuilder::new(fetcher)
    }

    /// Record new input text and (re)arm the debounce timer.
    ///
    /// Too-short input only disarms a pending timer; an in-flight request is
    /// left running. When the timer fires it dispatches the freshest text,
    /// not the text seen at scheduling time.
    pub fn set_text(&self, raw: &str) {
        let mut state = self.inner.lock_state();
        state.latest_text = raw.to_string();
        state.clear_debounce();

        let query = (self.inner.normalize)(raw);
        if !state.is_dispatchable(&query) {
            tracing::trace!(query = %query, "Input below min_length, timer disarmed");
            return;
        }

        state.debounce_generation += 1;
        let generation = state.debounce_generation;
        let deadline = Instant::now() + state.options.debounce();
        let weak = Arc::downgrade(&self.inner);

        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(orchestrator) = Self::upgrade(&weak) {
                orchestrator.fire_debounce(generation);
            }
        });
        state.debounce = Some(DebounceTimer { generation, handle });
        tracing::trace!(query = %query, generation, "Debounce timer armed");
    }

    /// Dispatch immediately, bypassing the debounce timer.
    ///
    /// `Some(raw)` replaces the latest text first; `None` dispatches whatever
    /// text was last recorded.
    pub fn run_immediate(&self, raw: Option<&str>) {
        let text = {
            let mut state = self.inner.lock_state();
            if let Some(raw) = raw {
                state.latest_text = raw.to_string();
            }
            state.clear_debounce();
            state.latest_text.clone()
        };
        self.dispatch(&text);
    }

    /// Disarm the debounce timer and abort the in-flight request, if any.
    pub fn cancel(&self) {
        let mut state = self.inner.lock_state();
        state.clear_debounce();
        if let Some(in_flight) = state.in_flight.take() {
            tracing::debug!(query = %in_flight.query, "Cancelling in-flight search");
            in_flight.token.cancel();
        }
    }

    /// Snapshot of the runtime state, for diagnostics and tests.
    pub fn get_state(&self) -> QuerySnapshot {
        let state = self.inner.lock_state();
        QuerySnapshot {
            latest_text: state.latest_text.clone(),
            last_completed_query: state.last_completed_query.clone(),
            last_result: state.last_result.clone(),
            in_flight_query: state.in_flight.as_ref().map(|f| f.query.clone()),
            has_abort_handle: state
                .in_flight
                .as_ref()
                .is_some_and(|f| !f.token.is_cancelled()),
            sequence: state.sequence,
            debounce_pending: state.debounce.is_some(),
            cache_entries: state.cache.len(),
            options: state.options.clone(),
        }
    }

    /// Hot-update tunables without touching in-flight state.
    pub fn set_options(&self, update: OptionsUpdate) {
        let mut state = self.inner.lock_state();
        state.options.apply_update(update);
        tracing::debug!(options = ?state.options, "Orchestrator options updated");
    }

    pub fn clear_cache(&self) {
        self.inner.lock_state().cache.clear();
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn fire_debounce(&self, generation: u64) {
        let text = {
            let mut state = self.inner.lock_state();
            match state.debounce.as_ref() {
                Some(timer) if timer.generation == generation => {}
                _ => return,
            }
            // Dropping our own handle detaches rather than aborts.
            state.debounce = None;
            state.latest_text.clone()
        };
        self.dispatch(&text);
    }

    fn dispatch(&self, raw: &str) {
        let query = (self.inner.normalize)(raw);

        let (seq, token) = {
            let mut state = self.inner.lock_state();
            if !state.is_dispatchable(&query) {
                return;
            }

            if state.options.use_cache {
                let ttl = state.options.cache_ttl();
                if let Some(items) = state.cache.get(&query, ttl) {
                    tracing::debug!(query = %query, hits = items.len(), "Cache hit");
                    state.outbox.push_back(QueryEvent::Succeeded {
                        query: query.clone(),
                        items,
                        from_cache: true,
                    });
                    if !state.options.refresh_on_cache {
                        drop(state);
                        self.inner.deliver();
                        return;
                    }
                }
            }

            if let Some(in_flight) = state.in_flight.as_ref() {
                if in_flight.query == query {
                    tracing::debug!(query = %query, "Identical query already in flight");
                    drop(state);
                    self.inner.deliver();
                    return;
                }
                tracing::debug!(
                    previous = %in_flight.query,
                    query = %query,
                    "Superseding in-flight search"
                );
                in_flight.token.cancel();
            }

            let token = CancellationToken::new();
            state.sequence += 1;
            let seq = state.sequence;
            state.in_flight = Some(InFlight {
                query: query.clone(),
                token: token.clone(),
            });
            state.outbox.push_back(QueryEvent::Started {
                query: query.clone(),
            });
            (seq, token)
        };

        self.inner.deliver();
        tracing::debug!(query = %query, seq, "Dispatching search");

        let fetcher = Arc::clone(&self.inner.fetcher);
        let weak = Arc::downgrade(&self.inner);
        self.inner.runtime.spawn(async move {
            let outcome = fetcher.fetch(&query, token.clone()).await;
            if let Some(orchestrator) = Self::upgrade(&weak) {
                orchestrator.complete(query, seq, &token, outcome);
            }
        });
    }

    fn complete(
        &self,
        query: String,
        seq: u64,
        token: &CancellationToken,
        outcome: FetchResult<Vec<MemoryHit>>,
    ) {
        {
            let mut state = self.inner.lock_state();
            let current = state.sequence == seq;

            match outcome {
                Ok(items) => {
                    let owns_slot = state
                        .in_flight
                        .as_ref()
                        .is_some_and(|f| f.query == query);
                    if current && owns_slot {
                        state.cache.insert(query.clone(), items.clone());
                        state.last_completed_query = Some(query.clone());
                        state.last_result = Some(items.clone());
                        state.outbox.push_back(QueryEvent::Succeeded {
                            query: query.clone(),
                            items,
                            from_cache: false,
                        });
                    } else {
                        tracing::debug!(query = %query, seq, "Dropping superseded result");
                    }
                }
                Err(error) if error.is_cancelled() || token.is_cancelled() => {
                    tracing::debug!(query = %query, seq, "Search cancelled");
                }
                Err(error) => {
                    if current {
                        tracing::warn!(query = %query, seq, error = %error, "Search failed");
                        state.outbox.push_back(QueryEvent::Failed {
                            query: query.clone(),
                            error,
                        });
                    } else {
                        tracing::debug!(query = %query, seq, error = %error, "Dropping superseded error");
                    }
                }
            }

            if current {
                state.in_flight = None;
                state.outbox.push_back(QueryEvent::Finished { query });
            }
        }
        self.inner.deliver();
    }
}

/// Builder for `QueryOrchestrator`.
pub struct QueryOrchestratorBuilder {
    fetcher: Arc<dyn SearchFetcher>,
    normalize: fn(&str) -> String,
    options: QueryOptions,
    observers: Vec<Arc<dyn QueryObserver>>,
}

impl QueryOrchestratorBuilder {
    pub fn new(fetcher: Arc<dyn SearchFetcher>) -> Self {
        Self {
            fetcher,
            normalize: normalize_query,
            options: QueryOptions::default(),
            observers: Vec::new(),
        }
    }

    /// Replace the query normalizer. Cache keys, single-flight checks and
    /// event queries all use it.
    pub fn normalizer(mut self, normalize: fn(&str) -> String) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Build the orchestrator, capturing the current Tokio runtime.
    pub fn build(self) -> CoreResult<QueryOrchestrator> {
        let runtime = Handle::try_current().map_err(|_| {
            CoreError::config("QueryOrchestrator must be built inside a Tokio runtime")
        })?;
        Ok(QueryOrchestrator {
            inner: Arc::new(Inner {
                fetcher: self.fetcher,
                normalize: self.normalize,
                observers: self.observers,
                runtime,
                state: Mutex::new(OrchestratorState::new(self.options)),
            }),
        })
    }
}
