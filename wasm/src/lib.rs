//! WebAssembly module for the Farm Weather Dashboard
//!
//! Provides client-side computation for:
//! - Agricultural insights from cached forecasts
//! - Dashboard rounding
//! - Pest risk and harvest weather classification
//! - Offline input validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Non-finite inputs are rejected rather than read as zero
fn to_decimal(value: f64, what: &str) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("{} must be a finite number, got {}", what, value))
}

fn pest_risk(avg_humidity: f64, total_rainfall: f64) -> Result<PestRisk, String> {
    Ok(shared::insights::classify_pest_risk(
        to_decimal(avg_humidity, "avg_humidity")?,
        to_decimal(total_rainfall, "total_rainfall")?,
    ))
}

fn harvest_weather(avg_humidity: f64, total_rainfall: f64) -> Result<HarvestWeather, String> {
    Ok(shared::insights::classify_harvest_weather(
        to_decimal(avg_humidity, "avg_humidity")?,
        to_decimal(total_rainfall, "total_rainfall")?,
    ))
}

/// Compute agricultural insights from current conditions and a forecast,
/// both given as JSON. Returns the insights as JSON.
#[wasm_bindgen]
pub fn compute_agricultural_insights(
    current_json: &str,
    forecast_json: &str,
) -> Result<String, JsValue> {
    let current: CurrentConditions = serde_json::from_str(current_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid current conditions JSON: {}", e)))?;
    let forecast: Vec<ForecastDay> = serde_json::from_str(forecast_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid forecast JSON: {}", e)))?;

    let insights = shared::insights::compute_insights(&current, &forecast)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&insights).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Round a measurement the way the dashboard displays it
#[wasm_bindgen]
pub fn round_for_dashboard(value: f64) -> Result<i32, JsValue> {
    to_decimal(value, "value")
        .map(round_to_whole)
        .map_err(|e| JsValue::from_str(&e))
}

/// Classify pest risk from average humidity and total rainfall
#[wasm_bindgen]
pub fn pest_risk_level(avg_humidity: f64, total_rainfall: f64) -> Result<String, JsValue> {
    pest_risk(avg_humidity, total_rainfall)
        .map(|risk| risk.to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Classify harvest weather from average humidity and total rainfall
#[wasm_bindgen]
pub fn harvest_weather_outlook(avg_humidity: f64, total_rainfall: f64) -> Result<String, JsValue> {
    harvest_weather(avg_humidity, total_rainfall)
        .map(|outlook| outlook.to_string())
        .map_err(|e| JsValue::from_str(&e))
}

/// Clamp a requested forecast horizon into the supported range
#[wasm_bindgen]
pub fn clamp_days(days: i32) -> u8 {
    clamp_forecast_days(days.into())
}

/// Check a location string before sending it to the server
#[wasm_bindgen]
pub fn is_valid_location(location: &str) -> bool {
    validate_location(location).is_ok()
}
