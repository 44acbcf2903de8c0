//! Core library for the weather cache service.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstraction over the upstream weather provider
//! - SQLite storage for provider responses
//! - The search-and-store / latest operations built on top of both
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use config::{Config, ProviderConfig, ServerConfig, StorageConfig};
pub use error::{ProviderError, ServiceError, StoreError};
pub use model::{SearchOutcome, SearchRequest, WeatherRecord};
pub use provider::{OpenWeatherProvider, ProviderReply, WeatherProvider};
pub use service::WeatherService;
pub use store::WeatherStore;
