//! Delivery Ordering Tests
//!
//! Results must reach observers in the order they were accepted, even when
//! completions land on different worker threads and an observer is slow.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use memory_bridge::{MemoryHit, QueryObserver, SearchBridge, SuccessMeta};

use crate::support::{hits, wait_until, Mode, ScriptedFetcher};

/// Blocks its worker thread while handling one particular query.
struct SlowObserver {
    slow_query: &'static str,
    delay: Duration,
    entered: AtomicBool,
    seen: Mutex<Vec<String>>,
}

impl SlowObserver {
    fn new(slow_query: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            slow_query,
            delay,
            entered: AtomicBool::new(false),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl QueryObserver for SlowObserver {
    fn on_success(&self, query: &str, _items: &[MemoryHit], _meta: SuccessMeta) {
        if query == self.slow_query {
            self.entered.store(true, Ordering::SeqCst);
            std::thread::sleep(self.delay);
        }
        self.seen.lock().unwrap().push(query.to_string());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_observer_sees_results_in_order() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let slow = SlowObserver::new("cat", Duration::from_millis(300));
    let bridge = SearchBridge::builder(fetcher.clone())
        .observer(slow.clone())
        .build()
        .unwrap();

    bridge.orchestrator().run_immediate(Some("cat"));
    wait_until(|| fetcher.resolve("cat", Ok(hits("cat")))).await;
    wait_until(|| slow.entered.load(Ordering::SeqCst)).await;

    // "cat" is still being delivered while "dog" dispatches and completes
    bridge.orchestrator().run_immediate(Some("dog"));
    wait_until(|| fetcher.resolve("dog", Ok(hits("dog")))).await;
    wait_until(|| slow.seen().len() == 2).await;

    assert_eq!(slow.seen(), vec!["cat", "dog"]);

    wait_until(|| bridge.session().staged().is_some_and(|(q, _)| q == "dog")).await;
    let state = bridge.get_state();
    assert_eq!(state.last_completed_query.as_deref(), Some("dog"));
    assert_eq!(
        bridge.session().staged().map(|(query, _)| query),
        state.last_completed_query
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_explicit_wait_after_slow_delivery_gets_fresh_result() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let slow = SlowObserver::new("cat", Duration::from_millis(200));
    let bridge = SearchBridge::builder(fetcher.clone())
        .observer(slow.clone())
        .build()
        .unwrap();

    bridge.orchestrator().run_immediate(Some("cat"));
    wait_until(|| fetcher.resolve("cat", Ok(hits("cat")))).await;
    wait_until(|| slow.entered.load(Ordering::SeqCst)).await;

    let waiter = {
        let bridge = bridge.clone();
        tokio::spawn(async move {
            bridge
                .search_and_wait("dog", Some(Duration::from_secs(5)))
                .await
        })
    };
    wait_until(|| fetcher.resolve("dog", Ok(hits("dog")))).await;

    assert_eq!(waiter.await.unwrap(), Ok(hits("dog")));
    wait_until(|| slow.seen().len() == 2).await;

    // The stale "cat" memo never overwrites "dog", so "cat" is not a fast path
    assert_eq!(
        bridge.session().staged().map(|(query, _)| query).as_deref(),
        Some("dog")
    );
}
