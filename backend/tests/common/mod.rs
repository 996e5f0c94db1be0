//! Shared fixtures for backend integration tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use farm_weather_backend::error::{AppError, AppResult};
use farm_weather_backend::external::{CurrentReading, WeatherProvider};
use rust_decimal::Decimal;
use shared::{CurrentConditions, ForecastDay, Location, WeatherAlert, WeatherLocation};

// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn location(name: &str) -> Location {
    Location::parse(name).unwrap()
}

pub fn sample_reading() -> CurrentReading {
    CurrentReading {
        location: WeatherLocation {
            name: "Nakuru".to_string(),
            region: "Nakuru".to_string(),
            country: "Kenya".to_string(),
            latitude: dec("-0.28"),
            longitude: dec("36.07"),
            timezone: "Africa/Nairobi".to_string(),
            localtime: "2024-06-01 14:45".to_string(),
        },
        conditions: CurrentConditions {
            temperature_celsius: dec("22.5"),
            feels_like_celsius: dec("23.4"),
            condition: "Partly cloudy".to_string(),
            condition_code: 1003,
            icon: "//cdn/116.png".to_string(),
            humidity_percent: 48,
            wind_speed_kph: dec("14.4"),
            wind_direction: "ENE".to_string(),
            precipitation_mm: dec("0.02"),
            uv_index: dec("7"),
            is_day: true,
            last_updated: "2024-06-01 14:30".to_string(),
        },
    }
}

/// `len` consecutive days starting 2024-06-01 with the given daily values
pub fn forecast_days(len: usize, avg_temp: &str, humidity: &str, rainfall: &str) -> Vec<ForecastDay> {
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    (0..len)
        .map(|i| ForecastDay {
            date: start + Duration::days(i as i64),
            max_temp_celsius: dec(avg_temp) + dec("5"),
            min_temp_celsius: dec(avg_temp) - dec("5"),
            avg_temp_celsius: dec(avg_temp),
            avg_humidity_percent: dec(humidity),
            total_precipitation_mm: dec(rainfall),
            max_wind_kph: dec("18"),
            uv_index: dec("6"),
            condition: format!("Day {}", i),
            icon: format!("//cdn/{}.png", i),
            chance_of_rain_percent: 20,
        })
        .collect()
}

pub fn sample_alert() -> WeatherAlert {
    WeatherAlert {
        headline: "Flood Warning".to_string(),
        severity: "Severe".to_string(),
        event: "Flood".to_string(),
        description: "River levels rising".to_string(),
        ..WeatherAlert::default()
    }
}

/// In-memory provider. A `None` field makes the matching fetch fail with a
/// transport error, or for current conditions with `current_status` when set.
pub struct FakeProvider {
    pub current: Option<CurrentReading>,
    pub current_status: Option<u16>,
    pub forecast: Option<Vec<ForecastDay>>,
    pub alerts: Option<Vec<WeatherAlert>>,
    pub requested_days: Mutex<Vec<i64>>,
}

impl FakeProvider {
    pub fn healthy() -> Self {
        Self {
            current: Some(sample_reading()),
            current_status: None,
            forecast: Some(forecast_days(5, "22", "65", "2")),
            alerts: Some(vec![sample_alert()]),
            requested_days: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_days(&self) -> Vec<i64> {
        self.requested_days.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_current(&self, _location: &Location) -> AppResult<CurrentReading> {
        self.current.clone().ok_or_else(|| match self.current_status {
            Some(status) => AppError::WeatherUpstream {
                status,
                message: format!("Failed to fetch current weather (HTTP {})", status),
                upstream_message: Some("No matching location found.".to_string()),
            },
            None => AppError::transport("current conditions unavailable"),
        })
    }

    async fn fetch_forecast(&self, _location: &Location, days: i64) -> AppResult<Vec<ForecastDay>> {
        self.requested_days.lock().unwrap().push(days);
        self.forecast
            .clone()
            .ok_or_else(|| AppError::transport("forecast unavailable"))
    }

    async fn fetch_alerts(&self, _location: &Location) -> AppResult<Vec<WeatherAlert>> {
        self.alerts
            .clone()
            .ok_or_else(|| AppError::WeatherUpstream {
                status: 500,
                message: "Failed to fetch weather alerts (HTTP 500)".to_string(),
                upstream_message: None,
            })
    }
}
