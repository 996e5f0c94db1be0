//! HTTP handlers for weather endpoints

use axum::{
    extract::{FromRequestParts, State},
    Json,
};
use serde::Deserialize;
use shared::{
    validate_location, ApiResponse, DashboardWeatherSnapshot, FarmingOutlook, ForecastDay,
    Location, WeatherAlert, MAX_FORECAST_DAYS,
};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::external::weather::CurrentReading;
use crate::services::weather::INSIGHT_FORECAST_DAYS;
use crate::AppState;

/// `Query` whose rejections render as the JSON error envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct WeatherParams<T>(pub T);

/// Query parameters shared by the weather endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct WeatherQuery {
    #[serde(default)]
    #[validate(custom = "location_param")]
    pub location: String,
    /// Forecast horizon; ignored by endpoints without one
    pub days: Option<i64>,
}

impl WeatherQuery {
    fn location(&self) -> AppResult<Location> {
        self.validate().map_err(|e| AppError::Validation {
            field: "location".to_string(),
            message: e.to_string(),
        })?;
        Ok(Location::parse(&self.location)?)
    }
}

fn location_param(value: &str) -> Result<(), ValidationError> {
    validate_location(value).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("location");
        err.message = Some(e.to_string().into());
        err
    })
}

/// Dashboard snapshot: current conditions, next four days, active alerts
pub async fn get_dashboard_weather(
    State(state): State<AppState>,
    WeatherParams(query): WeatherParams<WeatherQuery>,
) -> AppResult<Json<ApiResponse<DashboardWeatherSnapshot>>> {
    let location = query.location()?;
    let snapshot = state.weather.get_dashboard_weather(&location).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// Latest snapshot kept warm by the background poller
pub async fn get_latest_dashboard_weather(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardWeatherSnapshot>>> {
    let snapshot = state
        .poller
        .as_ref()
        .and_then(|poller| poller.latest())
        .ok_or_else(|| AppError::NotFound("Dashboard snapshot".to_string()))?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// Current conditions straight from the provider
pub async fn get_current_weather(
    State(state): State<AppState>,
    WeatherParams(query): WeatherParams<WeatherQuery>,
) -> AppResult<Json<ApiResponse<CurrentReading>>> {
    let location = query.location()?;
    let reading = state.weather.provider().fetch_current(&location).await?;
    Ok(Json(ApiResponse::ok(reading)))
}

/// Daily forecast, horizon clamped into [1, 7]
pub async fn get_weather_forecast(
    State(state): State<AppState>,
    WeatherParams(query): WeatherParams<WeatherQuery>,
) -> AppResult<Json<ApiResponse<Vec<ForecastDay>>>> {
    let location = query.location()?;
    let days = query.days.unwrap_or(MAX_FORECAST_DAYS);
    let forecast = state
        .weather
        .provider()
        .fetch_forecast(&location, days)
        .await?;
    Ok(Json(ApiResponse::ok(forecast)))
}

/// Active alerts for a location
pub async fn get_weather_alerts(
    State(state): State<AppState>,
    WeatherParams(query): WeatherParams<WeatherQuery>,
) -> AppResult<Json<ApiResponse<Vec<WeatherAlert>>>> {
    let location = query.location()?;
    let alerts = state.weather.provider().fetch_alerts(&location).await?;
    Ok(Json(ApiResponse::ok(alerts)))
}

/// Planting, irrigation, pest and harvest insights for a location
pub async fn get_farming_insights(
    State(state): State<AppState>,
    WeatherParams(query): WeatherParams<WeatherQuery>,
) -> AppResult<Json<ApiResponse<FarmingOutlook>>> {
    let location = query.location()?;
    let days = query.days.unwrap_or(INSIGHT_FORECAST_DAYS);
    let outlook = state.weather.get_farming_outlook(&location, days).await?;
    Ok(Json(ApiResponse::ok(outlook)))
}
