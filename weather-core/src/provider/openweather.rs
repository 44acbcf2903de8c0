use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

use crate::error::ProviderError;

use super::{ProviderReply, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_UNITS: &str = "metric";

/// OpenWeather "current weather" client.
///
/// The API key is not part of the provider: each caller supplies its own and it is
/// forwarded as the `APPID` query parameter.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    units: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_UNITS)
    }

    pub fn with_base_url(base_url: impl Into<String>, units: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            units: units.into(),
            http: Client::new(),
        }
    }

    fn request(&self, search: &str, api_key: &str) -> RequestBuilder {
        let url = format!("{}/weather", self.base_url);

        self.http.get(url).query(&[
            ("q", search),
            ("units", self.units.as_str()),
            ("APPID", api_key),
        ])
    }
}

impl Default for OpenWeatherProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        search: &str,
        api_key: &str,
    ) -> Result<ProviderReply, ProviderError> {
        info!(search, "Requesting current weather from OpenWeather");

        // Error messages are returned to callers and logged; keep the key out of them.
        let res = self
            .request(search, api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.without_url()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.without_url()))?;

        // Validate only; the text itself is what gets stored and replayed.
        serde_json::from_str::<IgnoredAny>(&text)?;

        if status.is_success() {
            debug!(search, %status, "OpenWeather answered");
        } else {
            warn!(search, %status, "OpenWeather rejected the request");
        }

        Ok(ProviderReply {
            status: status.as_u16(),
            body: text,
        })
    }
}
