//! Validation utilities for weather queries

use thiserror::Error;

/// Longest location string forwarded to the provider
pub const MAX_LOCATION_LENGTH: usize = 256;

/// Forecast horizon bounds accepted by this system
pub const MIN_FORECAST_DAYS: i64 = 1;
pub const MAX_FORECAST_DAYS: i64 = 7;

/// Location validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location must not be empty")]
    Empty,

    #[error("Location must be at most {} characters", MAX_LOCATION_LENGTH)]
    TooLong,
}

/// Validate a free-text location and return it trimmed
pub fn validate_location(raw: &str) -> Result<&str, LocationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LocationError::Empty);
    }
    if trimmed.chars().count() > MAX_LOCATION_LENGTH {
        return Err(LocationError::TooLong);
    }
    Ok(trimmed)
}

/// Clamp a requested forecast horizon into the supported range.
/// Out-of-range requests are clamped, not rejected.
pub fn clamp_forecast_days(days: i64) -> u8 {
    days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS) as u8
}
