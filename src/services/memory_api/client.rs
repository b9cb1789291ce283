//! Memory Search API Client
//!
//! `SearchFetcher` backed by the remote memory service. Each call is a single
//! `POST /v1/memories/search/`; there is no retry. The request is raced against
//! the cancellation token so a superseded search releases its connection.

use std::time::Duration;

use async_trait::async_trait;
use memory_bridge_core::{FetchError, FetchResult, MemoryHit, SearchFetcher};
use tokio_util::sync::CancellationToken;

use super::payload::{parse_http_error, parse_search_response, SearchRequest};
use crate::models::settings::ApiSettings;
use crate::utils::error::{AppError, AppResult};

const SEARCH_PATH: &str = "v1/memories/search/";

/// HTTP client for the memory search endpoint
#[derive(Debug, Clone)]
pub struct MemoryApiClient {
    client: reqwest::Client,
    search_url: url::Url,
    api_key: String,
    user_id: String,
    limit: u32,
    threshold: f32,
}

impl MemoryApiClient {
    /// Build a client from settings; fails without an API key.
    pub fn new(settings: &ApiSettings) -> AppResult<Self> {
        let api_key = settings.resolved_api_key().ok_or_else(|| {
            AppError::config("No API key configured (set api.api_key or MEMORY_BRIDGE_API_KEY)")
        })?;
        let search_url = search_url(&settings.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("memory-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_url,
            api_key,
            user_id: settings.user_id.clone(),
            limit: settings.limit,
            threshold: settings.threshold,
        })
    }

    pub fn search_url(&self) -> &str {
        self.search_url.as_str()
    }

    async fn send(&self, query: &str) -> FetchResult<Vec<MemoryHit>> {
        let body = SearchRequest {
            query,
            user_id: &self.user_id,
            limit: self.limit,
            threshold: self.threshold,
        };

        let response = self
            .client
            .post(self.search_url.clone())
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::network(format!("Failed to read response body: {}", e)))?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &text));
        }

        parse_search_response(&text)
    }
}

#[async_trait]
impl SearchFetcher for MemoryApiClient {
    async fn fetch(&self, query: &str, cancel: CancellationToken) -> FetchResult<Vec<MemoryHit>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.send(query) => {
                if let Ok(hits) = &result {
                    tracing::debug!(query = %query, hits = hits.len(), "Memory search completed");
                }
                result
            }
        }
    }
}

/// Join the search path onto a base URL, tolerating a missing trailing slash.
fn search_url(base_url: &str) -> AppResult<url::Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let parsed = url::Url::parse(&base)
        .map_err(|e| AppError::config(format!("Invalid base_url '{}': {}", base_url, e)))?;
    parsed
        .join(SEARCH_PATH)
        .map_err(|e| AppError::config(format!("Invalid search URL: {}", e)))
}
