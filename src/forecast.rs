//! Community forecast types and composition of the daily pipeline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::history::HistoricalData;
use crate::profile::synthesize;
use crate::surplus::windows::{OptimalWindow, find_optimal_windows};

/// Number of hourly points in a daily forecast.
pub const HOURS_PER_DAY: usize = 24;

/// Forecast values for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Hour of day (0-23).
    pub hour: u8,
    /// Expected production (kW, >= 0).
    pub production_kw: f64,
    /// Expected consumption (kW, >= 0).
    pub expected_consumption_kw: f64,
    /// `production_kw - expected_consumption_kw` (kW, signed).
    pub expected_surplus_kw: f64,
}

impl ForecastPoint {
    /// Creates a point, deriving the signed surplus.
    pub fn new(hour: u8, production_kw: f64, expected_consumption_kw: f64) -> Self {
        Self {
            hour,
            production_kw,
            expected_consumption_kw,
            expected_surplus_kw: production_kw - expected_consumption_kw,
        }
    }
}

/// Checks that `forecast` holds exactly 24 finite points with `hour == index`.
///
/// # Errors
///
/// Returns [`EngineError::MalformedForecast`] describing the first violation.
pub fn validate_forecast(forecast: &[ForecastPoint]) -> Result<()> {
    if forecast.len() != HOURS_PER_DAY {
        return Err(EngineError::MalformedForecast(format!(
            "expected {HOURS_PER_DAY} points, got {}",
            forecast.len()
        )));
    }
    for (i, p) in forecast.iter().enumerate() {
        if usize::from(p.hour) != i {
            return Err(EngineError::MalformedForecast(format!(
                "point {i} has hour {}",
                p.hour
            )));
        }
        if !(p.production_kw.is_finite()
            && p.expected_consumption_kw.is_finite()
            && p.expected_surplus_kw.is_finite())
        {
            return Err(EngineError::MalformedForecast(format!(
                "hour {i} has a non-finite value"
            )));
        }
    }
    Ok(())
}

/// Daily forecast for one community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityForecast {
    /// Organization the forecast belongs to.
    pub organization_id: String,
    /// Exactly 24 points, ascending by hour.
    pub forecast: Vec<ForecastPoint>,
    /// Positive-surplus windows, best first.
    pub optimal_windows: Vec<OptimalWindow>,
    /// Production dropped by the capacity bound (kWh).
    pub curtailed_kwh: f64,
}

impl CommunityForecast {
    /// Returns the point for `hour`, if in range.
    pub fn point(&self, hour: u8) -> Option<&ForecastPoint> {
        self.forecast.get(usize::from(hour))
    }

    /// Returns the window containing `hour`, if any.
    pub fn window_at(&self, hour: u8) -> Option<&OptimalWindow> {
        self.optimal_windows.iter().find(|w| w.contains(hour))
    }
}

/// Runs synthesis and window analysis for one community.
///
/// # Arguments
///
/// * `organization_id` - Community the forecast belongs to
/// * `historical` - Reduced historical aggregates
/// * `config` - Curve shapes and thresholds
///
/// # Returns
///
/// A `CommunityForecast` with 24 points and best-first windows.
///
/// # Errors
///
/// Returns [`EngineError::InvalidHistoricalData`] for invalid input and
/// [`EngineError::MalformedForecast`] if synthesis ever produced a bad sequence.
///
/// # Examples
///
/// ```
/// use cel_forecast::config::EngineConfig;
/// use cel_forecast::forecast::compute_forecast;
/// use cel_forecast::history::HistoricalData;
///
/// let data = HistoricalData::new(50.0, 100.0, 30.0).unwrap();
/// let fc = compute_forecast("cel-demo", &data, &EngineConfig::baseline()).unwrap();
/// assert_eq!(fc.forecast.len(), 24);
/// assert!(!fc.optimal_windows.is_empty());
/// ```
pub fn compute_forecast(
    organization_id: impl Into<String>,
    historical: &HistoricalData,
    config: &EngineConfig,
) -> Result<CommunityForecast> {
    let organization_id = organization_id.into();
    let profile = synthesize(historical, &config.production, &config.consumption)?;
    let optimal_windows = find_optimal_windows(&profile.points, config.thresholds.min_surplus_kw)?;

    debug!(
        organization_id = %organization_id,
        windows = optimal_windows.len(),
        "computed community forecast"
    );

    Ok(CommunityForecast {
        organization_id,
        forecast: profile.points,
        optimal_windows,
        curtailed_kwh: profile.curtailed_kwh,
    })
}
