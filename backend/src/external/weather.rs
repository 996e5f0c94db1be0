//! Weather API client for fetching weather data
//!
//! Integrates with a WeatherAPI-style provider for current conditions, multi-day
//! forecasts, and active alerts. Each call issues exactly one request; there is no
//! retry or caching at this layer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{
    clamp_forecast_days, CurrentConditions, ForecastDay, Location, WeatherAlert, WeatherLocation,
};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Source of weather data for a location
///
/// Implemented by [`WeatherClient`] against the real provider; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions plus the place the provider resolved
    async fn fetch_current(&self, location: &Location) -> AppResult<CurrentReading>;

    /// Daily forecast, day-ascending. `days` is clamped into [1, 7].
    async fn fetch_forecast(&self, location: &Location, days: i64) -> AppResult<Vec<ForecastDay>>;

    /// Active alerts; no alerts is an empty list, not an error
    async fn fetch_alerts(&self, location: &Location) -> AppResult<Vec<WeatherAlert>>;
}

/// Result of a current-conditions fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentReading {
    pub location: WeatherLocation,
    pub conditions: CurrentConditions,
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiLocation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    tz_id: String,
    #[serde(default)]
    localtime: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiCondition {
    #[serde(default)]
    text: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    code: i32,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    last_updated: String,
    temp_c: f64,
    #[serde(default)]
    feelslike_c: Option<f64>,
    #[serde(default = "default_is_day")]
    is_day: i32,
    #[serde(default)]
    condition: ApiCondition,
    #[serde(default)]
    wind_kph: f64,
    #[serde(default)]
    wind_dir: String,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    precip_mm: f64,
    #[serde(default)]
    uv: f64,
}

fn default_is_day() -> i32 {
    1
}

/// Response for current.json
#[derive(Debug, Deserialize)]
struct ApiCurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    #[serde(default)]
    maxwind_kph: f64,
    #[serde(default)]
    totalprecip_mm: f64,
    #[serde(default)]
    avghumidity: f64,
    #[serde(default)]
    daily_chance_of_rain: f64,
    #[serde(default)]
    condition: ApiCondition,
    #[serde(default)]
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: NaiveDate,
    day: ApiDay,
}

#[derive(Debug, Default, Deserialize)]
struct ApiForecast {
    #[serde(default)]
    forecastday: Vec<ApiForecastDay>,
}

/// Response for forecast.json
#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    #[serde(default)]
    forecast: Option<ApiForecast>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiAlert {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    msgtype: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    urgency: Option<String>,
    #[serde(default)]
    areas: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    certainty: Option<String>,
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    effective: Option<String>,
    #[serde(default)]
    expires: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    instruction: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiAlerts {
    #[serde(default)]
    alert: Option<Vec<ApiAlert>>,
}

/// Response for alerts.json
#[derive(Debug, Deserialize)]
struct ApiAlertsResponse {
    #[serde(default)]
    alerts: Option<ApiAlerts>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Create a client from the weather section of the configuration
    pub fn from_config(config: &WeatherConfig) -> AppResult<Self> {
        Self::new(
            config.api_endpoint.clone(),
            config.api_key.clone(),
            config.timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GET and decode the body, mapping every failure to an `AppError`
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &Location,
        extra_query: &[(&str, String)],
        what: &str,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(endpoint, location = %location, "Fetching {}", what);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", location.as_str())])
            .query(extra_query)
            .send()
            .await
            .map_err(|e| {
                let err = self.transport_error(e, what);
                tracing::warn!(endpoint, "Weather API request failed: {}", err);
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let upstream_message = parse_upstream_message(&body);
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                upstream_message = upstream_message.as_deref().unwrap_or(""),
                "Weather API error"
            );
            return Err(AppError::WeatherUpstream {
                status: status.as_u16(),
                message: format!("Failed to fetch {} (HTTP {})", what, status.as_u16()),
                upstream_message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            let err = if e.is_decode() {
                AppError::transport(format!(
                    "Failed to parse {} response: {}",
                    what,
                    e.without_url()
                ))
            } else {
                self.transport_error(e, what)
            };
            tracing::warn!(endpoint, "Weather API response unreadable: {}", err);
            err
        })
    }

    fn transport_error(&self, e: reqwest::Error, what: &str) -> AppError {
        if e.is_timeout() {
            AppError::transport(format!(
                "Timed out after {}s fetching {}",
                self.timeout.as_secs(),
                what
            ))
        } else {
            // The request URL carries the API key
            AppError::transport(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn fetch_current(&self, location: &Location) -> AppResult<CurrentReading> {
        let data: ApiCurrentResponse = self
            .get_json("current.json", location, &[], "current weather")
            .await?;

        Ok(convert_current_response(data))
    }

    async fn fetch_forecast(&self, location: &Location, days: i64) -> AppResult<Vec<ForecastDay>> {
        let days = clamp_forecast_days(days);
        let query = [
            ("days", days.to_string()),
            ("alerts", "yes".to_string()),
            ("aqi", "no".to_string()),
        ];
        let data: ApiForecastResponse = self
            .get_json("forecast.json", location, &query, "weather forecast")
            .await?;

        Ok(convert_forecast_response(data))
    }

    async fn fetch_alerts(&self, location: &Location) -> AppResult<Vec<WeatherAlert>> {
        let data: ApiAlertsResponse = self
            .get_json("alerts.json", location, &[], "weather alerts")
            .await?;

        Ok(convert_alerts_response(data))
    }
}

/// Pull `error.message` out of a provider error body, if it has one
fn parse_upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn to_percent(value: f64) -> i32 {
    value.round().clamp(0.0, 100.0) as i32
}

/// Convert provider current response to our format
fn convert_current_response(data: ApiCurrentResponse) -> CurrentReading {
    let current = data.current;
    let location = data.location;

    CurrentReading {
        location: WeatherLocation {
            name: location.name,
            region: location.region,
            country: location.country,
            latitude: to_decimal(location.lat),
            longitude: to_decimal(location.lon),
            timezone: location.tz_id,
            localtime: location.localtime,
        },
        conditions: CurrentConditions {
            temperature_celsius: to_decimal(current.temp_c),
            feels_like_celsius: to_decimal(current.feelslike_c.unwrap_or(current.temp_c)),
            condition: current.condition.text,
            condition_code: current.condition.code,
            icon: current.condition.icon,
            humidity_percent: to_percent(current.humidity),
            wind_speed_kph: to_decimal(current.wind_kph),
            wind_direction: current.wind_dir,
            precipitation_mm: to_decimal(current.precip_mm),
            uv_index: to_decimal(current.uv.max(0.0)),
            is_day: current.is_day != 0,
            last_updated: current.last_updated,
        },
    }
}

/// Convert provider forecast response to our format
fn convert_forecast_response(data: ApiForecastResponse) -> Vec<ForecastDay> {
    data.forecast
        .unwrap_or_default()
        .forecastday
        .into_iter()
        .map(|item| {
            let day = item.day;
            ForecastDay {
                date: item.date,
                max_temp_celsius: to_decimal(day.maxtemp_c),
                min_temp_celsius: to_decimal(day.mintemp_c),
                avg_temp_celsius: to_decimal(day.avgtemp_c),
                avg_humidity_percent: to_decimal(day.avghumidity),
                total_precipitation_mm: to_decimal(day.totalprecip_mm),
                max_wind_kph: to_decimal(day.maxwind_kph),
                uv_index: to_decimal(day.uv.max(0.0)),
                condition: day.condition.text,
                icon: day.condition.icon,
                chance_of_rain_percent: to_percent(day.daily_chance_of_rain),
            }
        })
        .collect()
}

/// Convert provider alerts response to our format
fn convert_alerts_response(data: ApiAlertsResponse) -> Vec<WeatherAlert> {
    data.alerts
        .and_then(|a| a.alert)
        .unwrap_or_default()
        .into_iter()
        .map(|a| WeatherAlert {
            headline: a.headline.unwrap_or_default(),
            msg_type: a.msgtype.unwrap_or_default(),
            severity: a.severity.unwrap_or_default(),
            urgency: a.urgency.unwrap_or_default(),
            areas: a.areas.unwrap_or_default(),
            category: a.category.unwrap_or_default(),
            certainty: a.certainty.unwrap_or_default(),
            event: a.event.unwrap_or_default(),
            note: a.note.unwrap_or_default(),
            effective: a.effective.unwrap_or_default(),
            expires: a.expires.unwrap_or_default(),
            description: a.desc.unwrap_or_default(),
            instruction: a.instruction.unwrap_or_default(),
        })
        .collect()
}
