//! Error types shared by the store, the provider and the service.

use std::path::PathBuf;

/// Errors raised by [`WeatherStore`](crate::store::WeatherStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database file could not be opened or its schema created.
    #[error("Weather database {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to store weather record: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("Failed to read weather record: {0}")]
    Read(#[source] rusqlite::Error),

    #[error("Failed to close weather database: {0}")]
    Close(#[source] rusqlite::Error),
}

/// Errors raised while talking to a weather provider.
///
/// A non-success HTTP status is not an error here; it is reported through
/// [`ProviderReply::status`](crate::provider::ProviderReply).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level failure: DNS, connect, TLS or reading the body.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("Provider returned a body that is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Stored weather payload #{id} is not valid JSON: {source}")]
    CorruptPayload {
        id: i64,
        source: serde_json::Error,
    },
}
