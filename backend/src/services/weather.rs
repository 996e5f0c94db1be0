//! Weather service for the farm dashboard
//!
//! Fans out the upstream calls for one location, merges them into a dashboard
//! snapshot, and derives agricultural insights. Current conditions are
//! mandatory; forecast and alerts degrade to empty lists when they fail.

use std::sync::Arc;

use shared::{
    derive_insights, CurrentConditions, DashboardCurrent, DashboardForecastDay,
    DashboardWeatherSnapshot, FarmingOutlook, ForecastAggregates, ForecastDay, Location,
};

use crate::error::AppResult;
use crate::external::weather::{CurrentReading, WeatherProvider};

/// Days requested for the dashboard: today plus the four it shows
pub const DASHBOARD_FORECAST_DAYS: i64 = 5;

/// Default horizon for insight calculations
pub const INSIGHT_FORECAST_DAYS: i64 = 7;

/// Forecast days shown on the dashboard, after today
const UPCOMING_DAYS_SHOWN: usize = 4;

/// Weather service
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    /// Create a new WeatherService over a provider
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn WeatherProvider {
        self.provider.as_ref()
    }

    /// Fetch current, forecast and alerts concurrently and merge them into one
    /// snapshot. Fails only when the current-conditions fetch fails.
    pub async fn get_dashboard_weather(
        &self,
        location: &Location,
    ) -> AppResult<DashboardWeatherSnapshot> {
        let (current, forecast, alerts) = tokio::join!(
            self.provider.fetch_current(location),
            self.provider.fetch_forecast(location, DASHBOARD_FORECAST_DAYS),
            self.provider.fetch_alerts(location),
        );

        let reading = current?;

        let forecast = match forecast {
            Ok(days) => slice_upcoming_days(&days),
            Err(e) => {
                tracing::warn!(location = %location, "Forecast unavailable, showing none: {}", e);
                Vec::new()
            }
        };

        let alerts = alerts.unwrap_or_else(|e| {
            tracing::warn!(location = %location, "Alerts unavailable, showing none: {}", e);
            Vec::new()
        });

        tracing::debug!(
            location = %location,
            forecast_days = forecast.len(),
            alerts = alerts.len(),
            "Dashboard weather assembled"
        );

        Ok(build_snapshot(reading, forecast, alerts))
    }

    /// Fetch current conditions and a forecast, then compute insights over the
    /// whole forecast. Both fetches are required here.
    pub async fn get_farming_outlook(
        &self,
        location: &Location,
        days: i64,
    ) -> AppResult<FarmingOutlook> {
        let (current, forecast) = tokio::join!(
            self.provider.fetch_current(location),
            self.provider.fetch_forecast(location, days),
        );

        let reading = current?;
        let forecast = forecast?;
        let aggregates = ForecastAggregates::from_forecast(&forecast)?;
        let insights = derive_insights(
            &aggregates,
            reading.conditions.wind_speed_kph,
            reading.conditions.uv_index,
        );

        Ok(FarmingOutlook {
            location: Some(reading.location),
            forecast_days: forecast.len(),
            aggregates,
            insights,
        })
    }
}

/// Assemble a snapshot. `last_updated` comes from the reading itself, not the
/// time of assembly.
pub fn build_snapshot(
    reading: CurrentReading,
    forecast: Vec<DashboardForecastDay>,
    alerts: Vec<shared::WeatherAlert>,
) -> DashboardWeatherSnapshot {
    DashboardWeatherSnapshot {
        current: to_dashboard_current(&reading.conditions),
        last_updated: reading.conditions.last_updated,
        location: Some(reading.location),
        forecast,
        alerts,
    }
}

pub fn to_dashboard_current(current: &CurrentConditions) -> DashboardCurrent {
    DashboardCurrent::from(current)
}

pub fn to_dashboard_forecast_day(day: &ForecastDay) -> DashboardForecastDay {
    DashboardForecastDay::from(day)
}

/// Skip today and keep the next four days (indices 1..5)
pub fn slice_upcoming_days(days: &[ForecastDay]) -> Vec<DashboardForecastDay> {
    days.iter()
        .skip(1)
        .take(UPCOMING_DAYS_SHOWN)
        .map(to_dashboard_forecast_day)
        .collect()
}
