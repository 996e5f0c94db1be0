//! Farm Weather Dashboard - Backend
//!
//! Fetches current conditions, forecasts and alerts from an upstream weather
//! provider, reshapes them into a dashboard snapshot and derives
//! agricultural insights for farmers.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::{DashboardPoller, WeatherService};

const DEFAULT_LOG_FILTER: &str =
    "farm_weather_server=debug,farm_weather_backend=debug,tower_http=debug";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherService,
    /// Present when a default location is configured
    pub poller: Option<Arc<DashboardPoller>>,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Setting `AGRI_LOG_FORMAT=json`
/// switches to JSON lines.
pub fn init_tracing() {
    let json = std::env::var("AGRI_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Farm Weather Dashboard API v1.0"
}
