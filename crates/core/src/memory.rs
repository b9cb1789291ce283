//! Memory Search Results
//!
//! The item type produced by a search attempt and delivered to observers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single memory returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryHit {
    /// Stable identifier assigned by the memory service
    pub id: String,
    /// The remembered text
    pub memory: String,
    /// Relevance score, when the service ranks results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Service-assigned categories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Free-form metadata attached when the memory was stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl MemoryHit {
    /// Create a hit with only an id and text; used by fetchers and tests.
    pub fn new(id: impl Into<String>, memory: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            memory: memory.into(),
            score: None,
            categories: Vec::new(),
            metadata: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach a relevance score.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}
