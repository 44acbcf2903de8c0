use serde::Deserialize;

/// Body of a search-and-store request.
///
/// `key` is the caller's provider API key; it is forwarded verbatim and never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub search: String,
    pub key: String,
}

/// One stored provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRecord {
    pub id: i64,
    /// Serialized JSON, stored as opaque text.
    pub payload: String,
}

/// Result of a search-and-store call that reached the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The provider answered with success and the body was stored under `id`.
    Saved { id: i64 },
    /// The provider answered with a non-success status; nothing was stored.
    /// `body` is the provider's JSON text, unmodified.
    Rejected { status: u16, body: String },
}
