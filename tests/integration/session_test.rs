//! Search Session Integration Tests
//!
//! Explicit "search now and wait" behavior on top of a live orchestrator.

use std::sync::Arc;
use std::time::Duration;

use memory_bridge::{FetchError, QueryOptions, SearchBridge, SessionError};
use tokio::time::sleep;

use crate::support::{hits, settle, Mode, RecordingObserver, ScriptedFetcher};

fn build(fetcher: &Arc<ScriptedFetcher>) -> (SearchBridge, Arc<RecordingObserver>) {
    let observer = RecordingObserver::new();
    let bridge = SearchBridge::builder(fetcher.clone())
        .options(QueryOptions::default())
        .observer(observer.clone())
        .build()
        .unwrap();
    (bridge, observer)
}

#[tokio::test(start_paused = true)]
async fn test_wait_resolves_with_fetched_items() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let (bridge, observer) = build(&fetcher);

    let waiter = {
        let bridge = bridge.clone();
        tokio::spawn(async move { bridge.search_and_wait("Green  Tea", None).await })
    };
    settle().await;
    assert_eq!(bridge.session().pending_query().as_deref(), Some("green tea"));

    fetcher.resolve("green tea", Ok(hits("green tea")));
    let items = waiter.await.unwrap().unwrap();

    assert_eq!(items, hits("green tea"));
    assert!(bridge.session().pending_query().is_none());
    // The UI observer saw the same result
    assert_eq!(observer.successes(), vec![("green tea".to_string(), false)]);
}

#[tokio::test(start_paused = true)]
async fn test_staged_result_short_circuits() {
    let fetcher = ScriptedFetcher::new(Mode::Echo);
    let (bridge, _observer) = build(&fetcher);

    // Typing path completes and stages the result
    bridge.set_text("cat");
    sleep(Duration::from_millis(200)).await;
    settle().await;
    assert_eq!(fetcher.call_count(), 1);

    let items = bridge.search_and_wait("  CAT ", None).await.unwrap();
    assert_eq!(items, hits("cat"));
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(bridge.get_state().sequence, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cache_hit_resolves_wait_immediately() {
    let fetcher = ScriptedFetcher::new(Mode::Echo);
    fetcher.fail_on("dog");
    let (bridge, _observer) = build(&fetcher);

    bridge.search_and_wait("cat", None).await.unwrap();

    // A failure clears the staged memo, so the next "cat" goes through the cache
    let err = bridge.search_and_wait("dog", None).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Fetch {
            source: FetchError::Http { status: 500, .. },
            ..
        }
    ));
    assert!(bridge.session().staged().is_none());

    let items = bridge.search_and_wait("cat", None).await.unwrap();
    assert_eq!(items, hits("cat"));
    assert_eq!(fetcher.calls(), vec!["cat", "dog"]);
}

#[tokio::test(start_paused = true)]
async fn test_newer_wait_supersedes_older() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let (bridge, _observer) = build(&fetcher);

    let first = {
        let bridge = bridge.clone();
        tokio::spawn(async move { bridge.search_and_wait("cat", None).await })
    };
    settle().await;
    let second = {
        let bridge = bridge.clone();
        tokio::spawn(async move { bridge.search_and_wait("dog", None).await })
    };
    settle().await;

    assert_eq!(
        first.await.unwrap(),
        Err(SessionError::Superseded {
            query: "cat".to_string()
        })
    );

    fetcher.resolve("dog", Ok(hits("dog")));
    assert_eq!(second.await.unwrap(), Ok(hits("dog")));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_leaves_orchestrator_running() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let (bridge, observer) = build(&fetcher);

    let err = bridge
        .search_and_wait("cat", Some(Duration::from_millis(500)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::NoResult {
            query: "cat".to_string(),
            timeout_ms: 500,
        }
    );
    assert!(err.is_no_result());
    assert!(bridge.session().pending_query().is_none());
    assert_eq!(bridge.get_state().in_flight_query.as_deref(), Some("cat"));

    // The late result still reaches the UI and the staged memo
    fetcher.resolve("cat", Ok(hits("cat")));
    settle().await;
    assert_eq!(observer.successes(), vec![("cat".to_string(), false)]);
    assert_eq!(bridge.session().staged(), Some(("cat".to_string(), hits("cat"))));
    assert!(!bridge.get_state().is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_unrelated_result_does_not_settle_wait() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let (bridge, observer) = build(&fetcher);

    let waiter = {
        let bridge = bridge.clone();
        tokio::spawn(async move {
            bridge
                .search_and_wait("cat", Some(Duration::from_millis(1_000)))
                .await
        })
    };
    settle().await;

    // Typing moves on; "dog" supersedes "cat" in the orchestrator
    bridge.set_text("dog");
    sleep(Duration::from_millis(200)).await;
    fetcher.resolve("dog", Ok(hits("dog")));
    settle().await;
    assert_eq!(observer.successes(), vec![("dog".to_string(), false)]);
    assert_eq!(bridge.session().pending_query().as_deref(), Some("cat"));

    let err = waiter.await.unwrap().unwrap_err();
    assert!(err.is_no_result());
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_is_not_a_fast_path() {
    let fetcher = ScriptedFetcher::new(Mode::Manual);
    let (bridge, _observer) = build(&fetcher);

    let waiter = {
        let bridge = bridge.clone();
        tokio::spawn(async move { bridge.search_and_wait("zebra", None).await })
    };
    settle().await;
    fetcher.resolve("zebra", Ok(Vec::new()));
    assert_eq!(waiter.await.unwrap(), Ok(Vec::new()));

    // Staged items are empty, so the second wait registers and resolves from cache
    let items = bridge.search_and_wait("zebra", None).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_too_short_query_times_out() {
    let fetcher = ScriptedFetcher::new(Mode::Echo);
    let (bridge, _observer) = build(&fetcher);

    let err = bridge
        .search_and_wait("ab", Some(Duration::from_millis(250)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::NoResult {
            query: "ab".to_string(),
            timeout_ms: 250,
        }
    );
    assert_eq!(fetcher.call_count(), 0);
}
