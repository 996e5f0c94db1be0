//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub weather_api_configured: bool,
    pub poller_running: bool,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather_api_configured: state.config.weather.is_configured(),
        poller_running: state
            .poller
            .as_ref()
            .map(|poller| poller.is_running())
            .unwrap_or(false),
    })
}
