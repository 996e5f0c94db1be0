//! HTTP handlers

pub mod health;
pub mod weather;

pub use health::health_check;
pub use weather::{
    get_current_weather, get_dashboard_weather, get_farming_insights,
    get_latest_dashboard_weather, get_weather_alerts, get_weather_forecast,
};
