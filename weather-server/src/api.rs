//! REST endpoints.
//!
//! - `POST /weatherSearch` - query the provider and store a successful response
//! - `GET /weather` - latest stored response
//! - `GET /health` - liveness and record count
//!
//! Provider and stored bodies are replayed as the exact JSON text received. Failures
//! are answered with the error message as plain text, see [`AppError`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

use weather_core::{SearchOutcome, SearchRequest, ServiceError};

use crate::state::AppState;

pub const NO_WEATHER_DATA: &str = "No weather data found";
pub const SAVED_MESSAGE: &str = "weather details saved";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weatherSearch", post(search_and_store))
        .route("/weather", get(latest_weather))
        .route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Respond with already-serialized JSON, leaving it byte for byte as given.
fn raw_json(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn search_and_store(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Response, AppError> {
    let outcome = state.service.search_and_store(&req.search, &req.key).await?;

    let response = match outcome {
        SearchOutcome::Saved { .. } => Json(MessageResponse {
            message: SAVED_MESSAGE,
        })
        .into_response(),
        SearchOutcome::Rejected { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            raw_json(status, body)
        }
    };

    Ok(response)
}

async fn latest_weather(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let response = match state.service.latest().await? {
        Some(record) => raw_json(StatusCode::OK, record.payload),
        None => NO_WEATHER_DATA.into_response(),
    };

    Ok(response)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: i64,
    /// `None` when the store could not be read.
    pub records: Option<u64>,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = match state.service.record_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Health check could not count records: {e}");
            None
        }
    };

    let now = Utc::now();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now,
        uptime_seconds: (now - state.started_at).num_seconds(),
        records,
    })
}

/// Failure surfaced to the client as a plain-text error message.
#[derive(Debug)]
pub struct AppError(ServiceError);

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Provider(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Store(_) | ServiceError::CorruptPayload { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = self.0.to_string();
        error!(%status, "Request failed: {message}");

        (status, message).into_response()
    }
}
