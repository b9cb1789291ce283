//! Memory Search Wire Types
//!
//! Request body and response decoding for the memory search endpoint.

use memory_bridge_core::{FetchError, MemoryHit};
use serde::{Deserialize, Serialize};

/// Maximum number of body characters kept in an HTTP error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// JSON body of `POST /v1/memories/search/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub user_id: &'a str,
    pub limit: u32,
    pub threshold: f32,
}

/// Accepted response shapes: a bare array, or an object wrapping the hits.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Hits(Vec<MemoryHit>),
    Wrapped {
        #[serde(alias = "memories")]
        results: Vec<MemoryHit>,
    },
}

/// Decode a successful response body into memory hits.
pub fn parse_search_response(body: &str) -> Result<Vec<MemoryHit>, FetchError> {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(SearchResponse::Hits(hits)) => Ok(hits),
        Ok(SearchResponse::Wrapped { results }) => Ok(results),
        Err(e) => Err(FetchError::decode(format!(
            "Unexpected search response: {}",
            e
        ))),
    }
}

/// Map a non-success status and body to a `FetchError`.
pub fn parse_http_error(status: u16, body: &str) -> FetchError {
    let detail = truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS);
    let message = match status {
        401 | 403 => format!("Invalid or unauthorized API key: {}", detail),
        429 => format!("Rate limited: {}", detail),
        _ if detail.is_empty() => "empty response body".to_string(),
        _ => detail,
    };
    FetchError::Http { status, message }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
