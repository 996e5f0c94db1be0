//! Route definitions for the farm weather dashboard

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Weather proxy and dashboard
        .nest("/weather", weather_routes())
}

/// Weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        // Aggregated dashboard view
        .route("/dashboard", get(handlers::get_dashboard_weather))
        .route("/dashboard/latest", get(handlers::get_latest_dashboard_weather))
        // Single upstream calls
        .route("/current", get(handlers::get_current_weather))
        .route("/forecast", get(handlers::get_weather_forecast))
        .route("/alerts", get(handlers::get_weather_alerts))
        // Derived insights
        .route("/insights", get(handlers::get_farming_insights))
}
