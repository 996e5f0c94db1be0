//! Error handling for the farm weather backend
//!
//! Every failure leaves the server as the `{success: false, error, message}`
//! envelope the dashboard already understands.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{ApiResponse, InsightError, LocationError};
use thiserror::Error;

/// Fallback text when a transport failure carries no usable message
pub const UNKNOWN_TRANSPORT_ERROR: &str = "Unknown error while contacting the weather service";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External service errors
    /// Provider answered with a non-2xx status
    #[error("{message}")]
    WeatherUpstream {
        status: u16,
        message: String,
        upstream_message: Option<String>,
    },

    /// Provider could not be reached, timed out, or sent an unreadable body
    #[error("{0}")]
    WeatherTransport(String),

    // Business logic errors
    #[error("Insights require at least one forecast day")]
    InsufficientForecast,

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Build a transport error, substituting a generic message when none is usable
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            AppError::WeatherTransport(UNKNOWN_TRANSPORT_ERROR.to_string())
        } else {
            AppError::WeatherTransport(message)
        }
    }

    /// Stable machine-readable code for logs and clients
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::WeatherUpstream { .. } => "WEATHER_UPSTREAM_ERROR",
            AppError::WeatherTransport(_) => "WEATHER_SERVICE_UNAVAILABLE",
            AppError::InsufficientForecast => "INSUFFICIENT_FORECAST",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Upstream-provided detail, when there is one
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            AppError::WeatherUpstream {
                upstream_message, ..
            } => upstream_message.as_deref(),
            _ => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // The provider answers 400 for locations it cannot resolve
            AppError::WeatherUpstream { status: 400 | 404, .. } => StatusCode::NOT_FOUND,
            AppError::WeatherUpstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::WeatherTransport(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InsufficientForecast => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Configuration(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        AppError::Validation {
            field: "location".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation {
            field: "query".to_string(),
            message: rejection.body_text(),
        }
    }
}

impl From<InsightError> for AppError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::EmptyForecast => AppError::InsufficientForecast,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };
        let message = self.upstream_message().map(str::to_string);

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!(code = self.code(), "Error: {:?}", self);
        } else {
            tracing::warn!(code = self.code(), "Request failed: {}", self);
        }

        (status, Json(ApiResponse::<()>::failure(error, message))).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
