//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use weather_core::WeatherService;

pub struct AppState {
    pub service: WeatherService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: WeatherService) -> Arc<Self> {
        Arc::new(Self {
            service,
            started_at: Utc::now(),
        })
    }
}
