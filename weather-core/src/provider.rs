use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, error::ProviderError};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Status and body of a provider response.
///
/// `body` is the exact text the provider sent. It has been checked to be JSON but is
/// otherwise untouched, so storing it keeps the provider's key order and formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current weather for `search`, authenticating with the caller's `api_key`.
    async fn current_weather(
        &self,
        search: &str,
        api_key: &str,
    ) -> Result<ProviderReply, ProviderError>;
}

/// Construct the provider described by the `[provider]` config section.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenWeatherProvider::with_base_url(
        config.provider.base_url.clone(),
        config.provider.units.clone(),
    ))
}
