//! Shared fixtures for the integration tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use memory_bridge::{FetchError, FetchResult, MemoryHit, QueryEvent, QueryObserver, SearchFetcher};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// How `ScriptedFetcher` answers a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reply immediately with one hit echoing the query.
    Echo,
    /// Hold until the test calls `resolve`; ignores cancellation.
    Manual,
    /// Hold until `resolve`, but return `Cancelled` as soon as the token fires.
    Cooperative,
}

/// Fetcher whose completions are driven by the test.
pub struct ScriptedFetcher {
    mode: Mode,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    waiting: Mutex<HashMap<String, VecDeque<oneshot::Sender<FetchResult<Vec<MemoryHit>>>>>>,
}

impl ScriptedFetcher {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            waiting: Mutex::new(HashMap::new()),
        })
    }

    /// In echo mode, answer `query` with an HTTP 500 instead.
    pub fn fail_on(&self, query: &str) {
        self.failing.lock().unwrap().insert(query.to_string());
    }

    /// Queries passed to `fetch`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Complete the oldest outstanding call for `query`.
    pub fn resolve(&self, query: &str, outcome: FetchResult<Vec<MemoryHit>>) -> bool {
        let tx = self
            .waiting
            .lock()
            .unwrap()
            .get_mut(query)
            .and_then(|queue| queue.pop_front());
        match tx {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl SearchFetcher for ScriptedFetcher {
    async fn fetch(&self, query: &str, cancel: CancellationToken) -> FetchResult<Vec<MemoryHit>> {
        self.calls.lock().unwrap().push(query.to_string());

        if self.mode == Mode::Echo {
            if self.failing.lock().unwrap().contains(query) {
                return Err(FetchError::Http {
                    status: 500,
                    message: "internal error".to_string(),
                });
            }
            return Ok(hits(query));
        }

        let (tx, rx) = oneshot::channel();
        self.waiting
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push_back(tx);

        let dropped = || -> FetchResult<Vec<MemoryHit>> { Err(FetchError::other("reply dropped")) };
        if self.mode == Mode::Cooperative {
            tokio::select! {
                _ = cancel.cancelled() => Err(FetchError::Cancelled),
                outcome = rx => outcome.unwrap_or_else(|_| dropped()),
            }
        } else {
            rx.await.unwrap_or_else(|_| dropped())
        }
    }
}

/// One hit whose text is the query itself.
pub fn hits(query: &str) -> Vec<MemoryHit> {
    vec![MemoryHit::new(format!("id-{}", query), query)]
}

/// Observer that keeps every event it sees.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<QueryEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<QueryEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Queries of `Succeeded` events, tagged with whether they came from cache.
    pub fn successes(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                QueryEvent::Succeeded {
                    query, from_cache, ..
                } => Some((query, from_cache)),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                QueryEvent::Failed { query, .. } => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn starts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                QueryEvent::Started { query } => Some(query),
                _ => None,
            })
            .collect()
    }

    pub fn finishes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                QueryEvent::Finished { query } => Some(query),
                _ => None,
            })
            .collect()
    }
}

impl QueryObserver for RecordingObserver {
    fn on_event(&self, event: &QueryEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Let spawned tasks run to their next await point.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Poll `condition` on the real clock until it holds, failing after 5s.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached within 5s"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
