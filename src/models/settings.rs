//! Settings Models
//!
//! Persisted configuration: where the memory search API lives, how to
//! authenticate, and the orchestrator/session tunables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::options::QueryOptions;

/// Environment variable consulted when the config file has no API key
pub const API_KEY_ENV: &str = "MEMORY_BRIDGE_API_KEY";

/// Default memory search API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.mem0.ai";

/// Default wait for an explicit search (milliseconds)
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 15_000;

/// Memory search API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the memory service
    pub base_url: String,
    /// API key; falls back to `MEMORY_BRIDGE_API_KEY` when empty
    #[serde(default)]
    pub api_key: String,
    /// User whose memories are searched
    pub user_id: String,
    /// Maximum number of hits per search
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Minimum relevance score (0.0 - 1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_limit() -> u32 {
    10
}

fn default_threshold() -> f32 {
    0.3
}

fn default_request_timeout_secs() -> u64 {
    20
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            user_id: "chrome-extension-user".to_string(),
            limit: default_limit(),
            threshold: default_threshold(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured API key, or the environment fallback.
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Explicit-search session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// How long `run_search_and_wait` waits before giving up
    #[serde(default = "default_session_timeout_ms")]
    pub default_timeout_ms: u64,
}

fn default_session_timeout_ms() -> u64 {
    DEFAULT_SESSION_TIMEOUT_MS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_SESSION_TIMEOUT_MS,
        }
    }
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub query: QueryOptions,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<u32>,
    pub threshold: Option<f32>,
    pub request_timeout_secs: Option<u64>,
    pub query: Option<QueryOptions>,
    pub session_timeout_ms: Option<u64>,
}

impl BridgeConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(base_url) = update.base_url {
            self.api.base_url = base_url;
        }
        if let Some(api_key) = update.api_key {
            self.api.api_key = api_key;
        }
        if let Some(user_id) = update.user_id {
            self.api.user_id = user_id;
        }
        if let Some(limit) = update.limit {
            self.api.limit = limit;
        }
        if let Some(threshold) = update.threshold {
            self.api.threshold = threshold;
        }
        if let Some(secs) = update.request_timeout_secs {
            self.api.request_timeout_secs = secs;
        }
        if let Some(query) = update.query {
            self.query = query;
        }
        if let Some(timeout_ms) = update.session_timeout_ms {
            self.session.default_timeout_ms = timeout_ms;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let parsed = url::Url::parse(&self.api.base_url)
            .map_err(|e| format!("Invalid base_url '{}': {}", self.api.base_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "Invalid base_url scheme: {}. Must be 'http' or 'https'",
                parsed.scheme()
            ));
        }

        if self.api.user_id.trim().is_empty() {
            return Err("user_id cannot be empty".to_string());
        }

        if self.api.limit == 0 {
            return Err("limit must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.api.threshold) {
            return Err(format!(
                "threshold must be between 0.0 and 1.0, got {}",
                self.api.threshold
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }

        if self.session.default_timeout_ms == 0 {
            return Err("session default_timeout_ms must be positive".to_string());
        }

        Ok(())
    }
}
