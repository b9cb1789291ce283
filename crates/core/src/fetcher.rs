//! Search Fetcher Trait
//!
//! The injected transport the orchestrator calls for every dispatch. The core
//! knows nothing about HTTP, authentication or storage; it only hands the
//! fetcher a normalized query and a cancellation token.
//!
//! Implementations should honor the token by aborting the underlying call and
//! returning `FetchError::Cancelled`, but the orchestrator tolerates
//! fetchers that ignore it: staleness is decided by sequence numbers, not by
//! whether the abort took effect.

use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::FetchResult;
use crate::memory::MemoryHit;

/// Asynchronous search transport.
#[async_trait]
pub trait SearchFetcher: Send + Sync {
    /// Run one search for an already-normalized query.
    ///
    /// Must resolve (not hang) on transport failure.
    async fn fetch(&self, query: &str, cancel: CancellationToken) -> FetchResult<Vec<MemoryHit>>;
}

/// Adapter turning an async closure into a `SearchFetcher`.
///
/// ```ignore
/// let fetcher = FnFetcher::new(|query, _cancel| async move {
///     Ok(vec![MemoryHit::new("1", query)])
/// });
/// ```
pub struct FnFetcher<F> {
    func: F,
}

impl<F> FnFetcher<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> SearchFetcher for FnFetcher<F>
where
    F: Fn(String, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult<Vec<MemoryHit>>> + Send,
{
    async fn fetch(&self, query: &str, cancel: CancellationToken) -> FetchResult<Vec<MemoryHit>> {
        (self.func)(query.to_string(), cancel).await
    }
}
