//! Search-and-store and latest-lookup operations.
//!
//! [`WeatherService`] owns the store and the provider it was built with; the HTTP layer
//! only translates its results into responses.

use serde::de::IgnoredAny;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{ServiceError, StoreError};
use crate::model::{SearchOutcome, WeatherRecord};
use crate::provider::WeatherProvider;
use crate::store::WeatherStore;

#[derive(Debug)]
pub struct WeatherService {
    store: Mutex<WeatherStore>,
    provider: Box<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(store: WeatherStore, provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            store: Mutex::new(store),
            provider,
        }
    }

    /// Query the provider for `search` and store the response if it succeeded.
    ///
    /// The provider's body is stored byte for byte. A non-success reply is returned as
    /// [`SearchOutcome::Rejected`] and leaves the store untouched, as does any provider
    /// error.
    pub async fn search_and_store(
        &self,
        search: &str,
        api_key: &str,
    ) -> Result<SearchOutcome, ServiceError> {
        let reply = self.provider.current_weather(search, api_key).await?;

        if !reply.is_success() {
            warn!(search, status = reply.status, "Provider reported failure; nothing stored");
            return Ok(SearchOutcome::Rejected {
                status: reply.status,
                body: reply.body,
            });
        }

        let id = self.store.lock().await.insert(&reply.body)?;

        info!(id, search, "Weather details saved");
        Ok(SearchOutcome::Saved { id })
    }

    /// The most recently stored response.
    ///
    /// The payload is checked to be JSON and returned as stored.
    pub async fn latest(&self) -> Result<Option<WeatherRecord>, ServiceError> {
        let Some(record) = self.store.lock().await.latest()? else {
            return Ok(None);
        };

        serde_json::from_str::<IgnoredAny>(&record.payload)
            .map_err(|source| ServiceError::CorruptPayload { id: record.id, source })?;

        Ok(Some(record))
    }

    pub async fn record_count(&self) -> Result<u64, StoreError> {
        self.store.lock().await.count()
    }

    /// Shut down the service, closing the underlying store.
    pub fn close(self) -> Result<(), StoreError> {
        self.store.into_inner().close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{OpenWeatherProvider, ProviderReply};
    use crate::test_utils::serve_once;
    use async_trait::async_trait;

    #[derive(Debug)]
    enum StubProvider {
        Reply(ProviderReply),
        Malformed,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_weather(
            &self,
            _search: &str,
            _api_key: &str,
        ) -> Result<ProviderReply, ProviderError> {
            match self {
                StubProvider::Reply(reply) => Ok(reply.clone()),
                StubProvider::Malformed => {
                    Err(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err().into())
                }
            }
        }
    }

    fn replying(status: u16, body: &str) -> Box<dyn WeatherProvider> {
        Box::new(StubProvider::Reply(ProviderReply {
            status,
            body: body.to_string(),
        }))
    }

    fn ok(body: &str) -> Box<dyn WeatherProvider> {
        replying(200, body)
    }

    #[tokio::test]
    async fn latest_on_empty_store_is_none() {
        let svc = WeatherService::new(WeatherStore::open_in_memory().unwrap(), ok("{}"));
        assert_eq!(svc.latest().await.unwrap(), None);
    }

    #[tokio::test]
    async fn successful_search_is_returned_by_latest() {
        let body = concat!(
            r#"{"name":"London","main":{"temp":12.5,"humidity":81},"#,
            r#""weather":[{"description":"light rain"}]}"#,
        );
        let svc = WeatherService::new(WeatherStore::open_in_memory().unwrap(), ok(body));

        let outcome = svc.search_and_store("London", "k").await.unwrap();
        assert_eq!(outcome, SearchOutcome::Saved { id: 1 });

        let latest = svc.latest().await.unwrap().unwrap();
        assert_eq!(latest.id, 1);
        assert_eq!(latest.payload, body);
    }

    #[tokio::test]
    async fn provider_body_is_stored_in_original_key_order() {
        let raw = concat!(
            r#"{"coord":{"lon":-0.13,"lat":51.51},"weather":[{"id":800}],"#,
            r#""base":"stations","name":"London","cod":200}"#,
        );
        let base_url = serve_once("200 OK", raw).await;
        let provider = OpenWeatherProvider::with_base_url(base_url, "metric");
        let store = WeatherStore::open_in_memory().unwrap();
        let svc = WeatherService::new(store, Box::new(provider));

        svc.search_and_store("London", "k").await.unwrap();

        let stored = svc.latest().await.unwrap().unwrap();
        assert_eq!(stored.payload, raw);
    }

    #[tokio::test]
    async fn each_search_advances_latest() {
        let store = WeatherStore::open_in_memory().unwrap();
        store.insert(r#"{"temp":20}"#).unwrap();
        let svc = WeatherService::new(store, ok(r#"{"temp":25}"#));

        let outcome = svc.search_and_store("x", "k").await.unwrap();
        assert_eq!(outcome, SearchOutcome::Saved { id: 2 });

        let latest = svc.latest().await.unwrap().unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.payload, r#"{"temp":25}"#);
    }

    #[tokio::test]
    async fn rejected_search_leaves_store_unchanged() {
        let store = WeatherStore::open_in_memory().unwrap();
        store.insert(r#"{"temp":20}"#).unwrap();

        let not_found = r#"{"cod":"404","message":"city not found"}"#;
        let svc = WeatherService::new(store, replying(404, not_found));

        let outcome = svc.search_and_store("Atlantis", "k").await.unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Rejected {
                status: 404,
                body: not_found.to_string(),
            }
        );

        assert_eq!(svc.record_count().await.unwrap(), 1);
        let latest = svc.latest().await.unwrap().unwrap();
        assert_eq!(latest.payload, r#"{"temp":20}"#);
    }

    #[tokio::test]
    async fn provider_error_is_propagated_and_nothing_stored() {
        let svc = WeatherService::new(
            WeatherStore::open_in_memory().unwrap(),
            Box::new(StubProvider::Malformed),
        );

        let err = svc.search_and_store("London", "k").await.unwrap_err();
        assert!(matches!(err, ServiceError::Provider(ProviderError::Malformed(_))));
        assert_eq!(svc.record_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_payload_is_reported() {
        let store = WeatherStore::open_in_memory().unwrap();
        store.insert("not json").unwrap();
        let svc = WeatherService::new(store, ok("{}"));

        let err = svc.latest().await.unwrap_err();
        assert!(matches!(err, ServiceError::CorruptPayload { id: 1, .. }));
    }

    #[tokio::test]
    async fn close_releases_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");

        let svc = WeatherService::new(WeatherStore::open(&path).unwrap(), ok(r#"{"temp":3}"#));
        svc.search_and_store("Oslo", "k").await.unwrap();
        svc.close().unwrap();

        let store = WeatherStore::open(&path).unwrap();
        assert_eq!(store.latest().unwrap().unwrap().payload, r#"{"temp":3}"#);
    }
}
