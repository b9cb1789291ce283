//! Memory API
//!
//! HTTP `SearchFetcher` for the hosted memory search service.

pub mod client;
pub mod payload;

pub use client::MemoryApiClient;
pub use payload::{parse_http_error, parse_search_response, SearchRequest};
