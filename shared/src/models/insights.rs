//! Agricultural insight models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::weather::WeatherLocation;

/// Pest pressure tier derived from humidity and rainfall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PestRisk {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for PestRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PestRisk::Low => write!(f, "low"),
            PestRisk::Medium => write!(f, "medium"),
            PestRisk::High => write!(f, "high"),
        }
    }
}

/// How suitable the coming days are for harvesting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HarvestWeather {
    Excellent,
    Good,
    Poor,
}

impl std::fmt::Display for HarvestWeather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarvestWeather::Excellent => write!(f, "excellent"),
            HarvestWeather::Good => write!(f, "good"),
            HarvestWeather::Poor => write!(f, "poor"),
        }
    }
}

/// Farming advisories, declared in the order they are reported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    HeatStress,
    FrostProtection,
    Drainage,
    IrrigationPlanning,
    PestMonitoring,
    Mulching,
    WindProtection,
    UvProtection,
    /// Emitted alone when no other advisory applies
    Favorable,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::HeatStress => {
                "High temperatures expected. Increase irrigation and provide shade for sensitive crops."
            }
            Advisory::FrostProtection => {
                "Low temperatures expected. Protect crops from frost and consider delaying planting."
            }
            Advisory::Drainage => {
                "Heavy rainfall expected. Ensure proper field drainage and watch for fungal diseases."
            }
            Advisory::IrrigationPlanning => {
                "Little rainfall expected. Plan irrigation schedules and conserve water."
            }
            Advisory::PestMonitoring => {
                "High humidity levels. Monitor crops closely for pests and fungal infections."
            }
            Advisory::Mulching => {
                "Low humidity levels. Increase watering frequency and mulch to retain soil moisture."
            }
            Advisory::WindProtection => {
                "Strong winds. Secure structures and protect young plants from wind damage."
            }
            Advisory::UvProtection => {
                "Very high UV index. Limit midday field work and protect sensitive crops from sun exposure."
            }
            Advisory::Favorable => "Weather conditions are favorable for normal farming activities.",
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Aggregate statistics over a forecast horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastAggregates {
    /// Mean of the per-day average humidity (%)
    pub avg_humidity: Decimal,
    /// Sum of the per-day total precipitation (mm)
    pub total_rainfall: Decimal,
    /// Mean of the per-day average temperature (°C)
    pub avg_temp: Decimal,
}

/// Derived farming judgments. Recomputed on every request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgriculturalInsights {
    pub is_good_for_planting: bool,
    pub irrigation_needed: bool,
    pub pest_risk: PestRisk,
    pub harvest_weather: HarvestWeather,
    /// All matching advisories in priority order, never empty
    pub recommendations: Vec<String>,
}

/// Insights together with the forecast statistics they were derived from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FarmingOutlook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<WeatherLocation>,
    pub forecast_days: usize,
    pub aggregates: ForecastAggregates,
    pub insights: AgriculturalInsights,
}
