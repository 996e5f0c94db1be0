//! Farm Weather Dashboard - Backend Server

use std::sync::Arc;

use farm_weather_backend::{
    create_app,
    external::WeatherClient,
    init_tracing,
    services::{DashboardPoller, WeatherService},
    AppState, Config,
};
use shared::Location;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::load()?;

    tracing::info!("Starting Farm Weather Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    if !config.weather.is_configured() {
        tracing::warn!("Weather API key is not set; upstream calls will be rejected");
    }

    let client = WeatherClient::from_config(&config.weather)?;
    tracing::info!("Weather provider: {}", client.base_url());
    let weather = WeatherService::new(Arc::new(client));

    // Keep a snapshot warm for the default location
    let poller = match config.weather.default_location.as_deref() {
        Some(raw) => {
            let location = Location::parse(raw)?;
            tracing::info!(
                "Polling dashboard for {} every {:?}",
                location,
                config.weather.refresh_interval()
            );
            Some(Arc::new(DashboardPoller::start(
                weather.clone(),
                location,
                config.weather.refresh_interval(),
            )))
        }
        None => None,
    };

    let state = AppState {
        config: Arc::new(config.clone()),
        weather,
        poller: poller.clone(),
    };

    let app = create_app(state);

    let addr = config.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(poller) = poller {
        match Arc::try_unwrap(poller) {
            Ok(poller) => poller.shutdown().await,
            Err(shared) => shared.stop(),
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
