//! Query Normalization
//!
//! Maps raw input text to the canonical key used for caching, de-duplication
//! and "is this the same search" checks everywhere else in the workspace.

/// Normalize raw query text.
///
/// Trims the edges, collapses every run of whitespace to a single space and
/// lowercases. Empty input yields the empty string. Idempotent:
/// `normalize_query(&normalize_query(s)) == normalize_query(s)`.
pub fn normalize_query(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&word.to_lowercase());
    }
    out
}

/// Length of a normalized query in characters, as compared against `min_length`.
pub fn query_len(normalized: &str) -> usize {
    normalized.chars().count()
}
