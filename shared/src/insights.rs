//! Agricultural insight engine
//!
//! Turns a multi-day forecast plus current conditions into planting, irrigation,
//! pest and harvest judgments and a ranked list of advisories. Everything here is
//! a pure function of its arguments: no I/O, no clock, no randomness.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    Advisory, AgriculturalInsights, CurrentConditions, ForecastAggregates, ForecastDay,
    HarvestWeather, PestRisk,
};

const fn whole(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 0)
}

// Planting window
pub const PLANTING_MIN_TEMP_C: Decimal = whole(15);
pub const PLANTING_MAX_TEMP_C: Decimal = whole(35);
pub const PLANTING_MAX_RAINFALL_MM: Decimal = whole(50);

// Irrigation
pub const IRRIGATION_MAX_RAINFALL_MM: Decimal = whole(10);
pub const IRRIGATION_MAX_HUMIDITY: Decimal = whole(60);

// Pest risk tiers
pub const PEST_HIGH_HUMIDITY: Decimal = whole(80);
pub const PEST_HIGH_RAINFALL_MM: Decimal = whole(30);
pub const PEST_MEDIUM_HUMIDITY: Decimal = whole(60);
pub const PEST_MEDIUM_RAINFALL_MM: Decimal = whole(15);

// Harvest weather tiers
pub const HARVEST_EXCELLENT_RAINFALL_MM: Decimal = whole(5);
pub const HARVEST_EXCELLENT_HUMIDITY: Decimal = whole(70);
pub const HARVEST_GOOD_RAINFALL_MM: Decimal = whole(15);
pub const HARVEST_GOOD_HUMIDITY: Decimal = whole(80);

// Advisory triggers
pub const HEAT_STRESS_TEMP_C: Decimal = whole(35);
pub const FROST_RISK_TEMP_C: Decimal = whole(10);
pub const HEAVY_RAINFALL_MM: Decimal = whole(50);
pub const LOW_RAINFALL_MM: Decimal = whole(5);
pub const HIGH_HUMIDITY: Decimal = whole(80);
pub const LOW_HUMIDITY: Decimal = whole(40);
pub const STRONG_WIND_KPH: Decimal = whole(25);
pub const HIGH_UV_INDEX: Decimal = whole(8);

/// Insight computation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InsightError {
    #[error("Insights require at least one forecast day")]
    EmptyForecast,
}

impl ForecastAggregates {
    /// Aggregate a non-empty forecast
    pub fn from_forecast(forecast: &[ForecastDay]) -> Result<Self, InsightError> {
        if forecast.is_empty() {
            return Err(InsightError::EmptyForecast);
        }

        let days = Decimal::from(forecast.len());
        let humidity_sum: Decimal = forecast.iter().map(|d| d.avg_humidity_percent).sum();
        let temp_sum: Decimal = forecast.iter().map(|d| d.avg_temp_celsius).sum();
        let total_rainfall: Decimal = forecast.iter().map(|d| d.total_precipitation_mm).sum();

        Ok(Self {
            avg_humidity: humidity_sum / days,
            total_rainfall,
            avg_temp: temp_sum / days,
        })
    }
}

/// Planting needs a mild average temperature and no waterlogging
pub fn is_good_for_planting(avg_temp: Decimal, total_rainfall: Decimal) -> bool {
    avg_temp >= PLANTING_MIN_TEMP_C
        && avg_temp <= PLANTING_MAX_TEMP_C
        && total_rainfall < PLANTING_MAX_RAINFALL_MM
}

/// Irrigation is needed when it is both dry and the air holds little moisture
pub fn needs_irrigation(avg_humidity: Decimal, total_rainfall: Decimal) -> bool {
    total_rainfall < IRRIGATION_MAX_RAINFALL_MM && avg_humidity < IRRIGATION_MAX_HUMIDITY
}

/// Classify pest risk. Either humidity or rainfall alone can raise the tier.
pub fn classify_pest_risk(avg_humidity: Decimal, total_rainfall: Decimal) -> PestRisk {
    if avg_humidity > PEST_HIGH_HUMIDITY || total_rainfall > PEST_HIGH_RAINFALL_MM {
        PestRisk::High
    } else if avg_humidity > PEST_MEDIUM_HUMIDITY || total_rainfall > PEST_MEDIUM_RAINFALL_MM {
        PestRisk::Medium
    } else {
        PestRisk::Low
    }
}

/// Classify harvest weather. Both rainfall and humidity must be low for a tier.
pub fn classify_harvest_weather(avg_humidity: Decimal, total_rainfall: Decimal) -> HarvestWeather {
    if total_rainfall < HARVEST_EXCELLENT_RAINFALL_MM && avg_humidity < HARVEST_EXCELLENT_HUMIDITY {
        HarvestWeather::Excellent
    } else if total_rainfall < HARVEST_GOOD_RAINFALL_MM && avg_humidity < HARVEST_GOOD_HUMIDITY {
        HarvestWeather::Good
    } else {
        HarvestWeather::Poor
    }
}

/// Inputs the advisory rules look at
#[derive(Debug, Clone, Copy)]
struct RuleInputs {
    aggregates: ForecastAggregates,
    wind_speed_kph: Decimal,
    uv_index: Decimal,
}

type AdvisoryRule = (Advisory, fn(&RuleInputs) -> bool);

/// Advisory rules in reporting order
const ADVISORY_RULES: [AdvisoryRule; 8] = [
    (Advisory::HeatStress, heat_stress),
    (Advisory::FrostProtection, frost_risk),
    (Advisory::Drainage, heavy_rainfall),
    (Advisory::IrrigationPlanning, low_rainfall),
    (Advisory::PestMonitoring, high_humidity),
    (Advisory::Mulching, low_humidity),
    (Advisory::WindProtection, strong_wind),
    (Advisory::UvProtection, high_uv),
];

fn heat_stress(inputs: &RuleInputs) -> bool {
    inputs.aggregates.avg_temp > HEAT_STRESS_TEMP_C
}

fn frost_risk(inputs: &RuleInputs) -> bool {
    inputs.aggregates.avg_temp < FROST_RISK_TEMP_C
}

fn heavy_rainfall(inputs: &RuleInputs) -> bool {
    inputs.aggregates.total_rainfall > HEAVY_RAINFALL_MM
}

fn low_rainfall(inputs: &RuleInputs) -> bool {
    inputs.aggregates.total_rainfall < LOW_RAINFALL_MM
}

fn high_humidity(inputs: &RuleInputs) -> bool {
    inputs.aggregates.avg_humidity > HIGH_HUMIDITY
}

fn low_humidity(inputs: &RuleInputs) -> bool {
    inputs.aggregates.avg_humidity < LOW_HUMIDITY
}

fn strong_wind(inputs: &RuleInputs) -> bool {
    inputs.wind_speed_kph > STRONG_WIND_KPH
}

fn high_uv(inputs: &RuleInputs) -> bool {
    inputs.uv_index > HIGH_UV_INDEX
}

/// Every matching advisory in priority order, or `[Favorable]` if none match
pub fn recommend(
    aggregates: &ForecastAggregates,
    wind_speed_kph: Decimal,
    uv_index: Decimal,
) -> Vec<Advisory> {
    let inputs = RuleInputs {
        aggregates: *aggregates,
        wind_speed_kph,
        uv_index,
    };

    let matched: Vec<Advisory> = ADVISORY_RULES
        .iter()
        .filter(|(_, applies)| applies(&inputs))
        .map(|(advisory, _)| *advisory)
        .collect();

    if matched.is_empty() {
        vec![Advisory::Favorable]
    } else {
        matched
    }
}

/// Derive insights from precomputed aggregates and the current wind and UV readings
pub fn derive_insights(
    aggregates: &ForecastAggregates,
    wind_speed_kph: Decimal,
    uv_index: Decimal,
) -> AgriculturalInsights {
    let ForecastAggregates {
        avg_humidity,
        total_rainfall,
        avg_temp,
    } = *aggregates;

    AgriculturalInsights {
        is_good_for_planting: is_good_for_planting(avg_temp, total_rainfall),
        irrigation_needed: needs_irrigation(avg_humidity, total_rainfall),
        pest_risk: classify_pest_risk(avg_humidity, total_rainfall),
        harvest_weather: classify_harvest_weather(avg_humidity, total_rainfall),
        recommendations: recommend(aggregates, wind_speed_kph, uv_index)
            .into_iter()
            .map(|a| a.message().to_string())
            .collect(),
    }
}

/// Compute insights for a forecast. The forecast must not be empty.
pub fn compute_insights(
    current: &CurrentConditions,
    forecast: &[ForecastDay],
) -> Result<AgriculturalInsights, InsightError> {
    let aggregates = ForecastAggregates::from_forecast(forecast)?;
    Ok(derive_insights(
        &aggregates,
        current.wind_speed_kph,
        current.uv_index,
    ))
}
