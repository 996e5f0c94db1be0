//! Weather data models
//!
//! Provider-neutral readings (`CurrentConditions`, `ForecastDay`, `WeatherAlert`)
//! and the rounded shapes the dashboard renders.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The place a provider resolved a location query to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WeatherLocation {
    pub name: String,
    pub region: String,
    pub country: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub timezone: String,
    pub localtime: String,
}

/// Current conditions at one point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub temperature_celsius: Decimal,
    pub feels_like_celsius: Decimal,
    pub condition: String,
    pub condition_code: i32,
    pub icon: String,
    pub humidity_percent: i32,
    pub wind_speed_kph: Decimal,
    pub wind_direction: String,
    /// Precipitation over the provider's last measurement interval
    pub precipitation_mm: Decimal,
    pub uv_index: Decimal,
    pub is_day: bool,
    /// Provider timestamp, kept verbatim
    pub last_updated: String,
}

/// One day of a forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp_celsius: Decimal,
    pub min_temp_celsius: Decimal,
    pub avg_temp_celsius: Decimal,
    pub avg_humidity_percent: Decimal,
    pub total_precipitation_mm: Decimal,
    pub max_wind_kph: Decimal,
    pub uv_index: Decimal,
    pub condition: String,
    pub icon: String,
    pub chance_of_rain_percent: i32,
}

/// Active weather alert issued for a location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WeatherAlert {
    pub headline: String,
    pub msg_type: String,
    pub severity: String,
    pub urgency: String,
    pub areas: String,
    pub category: String,
    pub certainty: String,
    pub event: String,
    pub note: String,
    pub effective: String,
    pub expires: String,
    pub description: String,
    pub instruction: String,
}

/// Current conditions as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardCurrent {
    pub temperature: i32,
    pub feels_like: i32,
    pub condition: String,
    pub icon: String,
    pub humidity: i32,
    pub wind_speed: i32,
    pub wind_direction: String,
    pub precipitation: Decimal,
    pub uv_index: Decimal,
}

/// Forecast day as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardForecastDay {
    pub date: NaiveDate,
    pub max_temp: i32,
    pub min_temp: i32,
    pub condition: String,
    pub icon: String,
    pub chance_of_rain: i32,
    pub precipitation: Decimal,
    pub humidity: Decimal,
}

/// Everything the dashboard needs for one location, fetched together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardWeatherSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<WeatherLocation>,
    pub current: DashboardCurrent,
    pub forecast: Vec<DashboardForecastDay>,
    pub alerts: Vec<WeatherAlert>,
    pub last_updated: String,
}

impl From<&CurrentConditions> for DashboardCurrent {
    fn from(current: &CurrentConditions) -> Self {
        DashboardCurrent {
            temperature: round_to_whole(current.temperature_celsius),
            feels_like: round_to_whole(current.feels_like_celsius),
            condition: current.condition.clone(),
            icon: current.icon.clone(),
            humidity: current.humidity_percent,
            wind_speed: round_to_whole(current.wind_speed_kph),
            wind_direction: current.wind_direction.clone(),
            precipitation: current.precipitation_mm,
            uv_index: current.uv_index,
        }
    }
}

impl From<&ForecastDay> for DashboardForecastDay {
    fn from(day: &ForecastDay) -> Self {
        DashboardForecastDay {
            date: day.date,
            max_temp: round_to_whole(day.max_temp_celsius),
            min_temp: round_to_whole(day.min_temp_celsius),
            condition: day.condition.clone(),
            icon: day.icon.clone(),
            chance_of_rain: day.chance_of_rain_percent,
            precipitation: day.total_precipitation_mm,
            humidity: day.avg_humidity_percent,
        }
    }
}

/// Round to the nearest whole number, halves toward positive infinity
/// (2.5 -> 3, -2.5 -> -2).
pub fn round_to_whole(value: Decimal) -> i32 {
    let rounded = (value + Decimal::new(5, 1)).floor();
    rounded.to_i32().unwrap_or(if rounded.is_sign_negative() {
        i32::MIN
    } else {
        i32::MAX
    })
}
