//! External API integrations

pub mod weather;

pub use weather::{CurrentReading, WeatherClient, WeatherProvider};
