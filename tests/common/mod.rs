//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use cel_forecast::config::EngineConfig;
use cel_forecast::forecast::{CommunityForecast, ForecastPoint, compute_forecast};
use cel_forecast::history::HistoricalData;

/// Tolerance for energy sums over 24 points.
pub const EPS: f64 = 1e-9;

/// Reference community: 50 kWh/day produced, 100 kWh/day consumed, 30 kWp.
pub fn reference_history() -> HistoricalData {
    HistoricalData::new(50.0, 100.0, 30.0).expect("valid reference history")
}

/// Forecast of the reference community with the baseline config.
pub fn reference_forecast() -> CommunityForecast {
    compute_forecast("cel-ref", &reference_history(), &EngineConfig::baseline())
        .expect("reference forecast")
}

/// Builds a 24-point forecast from per-hour surplus values.
///
/// Positive surplus becomes production, negative becomes consumption.
pub fn forecast_from_surplus(surplus: &[f64; 24]) -> Vec<ForecastPoint> {
    surplus
        .iter()
        .enumerate()
        .map(|(h, &s)| ForecastPoint::new(h as u8, s.max(0.0), (-s).max(0.0)))
        .collect()
}

/// Sums production over all points.
pub fn total_production(points: &[ForecastPoint]) -> f64 {
    points.iter().map(|p| p.production_kw).sum()
}

/// Sums consumption over all points.
pub fn total_consumption(points: &[ForecastPoint]) -> f64 {
    points.iter().map(|p| p.expected_consumption_kw).sum()
}
