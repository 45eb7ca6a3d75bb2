//! Daily profile synthesis: turns historical scalars into 24 hourly points.

/// Two-peak household consumption curve.
pub mod consumption;
/// Bell-shaped solar production curve with capacity clamp.
pub mod production;
pub mod shape;

pub use consumption::{TwoPeakLoad, consumption_profile};
pub use production::{ProductionProfile, SolarBell, production_profile};
pub use shape::ShapeCurve;

use tracing::debug;

use crate::config::{ConsumptionConfig, ProductionConfig};
use crate::error::Result;
use crate::forecast::{ForecastPoint, HOURS_PER_DAY};
use crate::history::HistoricalData;

/// Synthesized hourly profile for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProfile {
    /// Exactly 24 points, ascending by hour.
    pub points: Vec<ForecastPoint>,
    /// Production that did not fit under installed capacity (kWh).
    pub curtailed_kwh: f64,
}

/// Builds the 24-point production/consumption/surplus profile.
///
/// Deterministic: identical inputs yield identical output.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidHistoricalData`] if `historical`
/// fails validation.
pub fn synthesize(
    historical: &HistoricalData,
    production: &ProductionConfig,
    consumption: &ConsumptionConfig,
) -> Result<DailyProfile> {
    historical.validate()?;

    let pv = production_profile(
        &SolarBell::from(production),
        historical.avg_daily_production_kwh,
        historical.installed_capacity_kwp,
    );
    let load = consumption_profile(
        &TwoPeakLoad::from(consumption),
        historical.avg_daily_consumption_kwh,
    );

    let points: Vec<ForecastPoint> = (0..HOURS_PER_DAY)
        .map(|h| ForecastPoint::new(h as u8, pv.hourly_kw[h], load[h]))
        .collect();

    debug!(
        production_kwh = historical.avg_daily_production_kwh,
        consumption_kwh = historical.avg_daily_consumption_kwh,
        capacity_kwp = historical.installed_capacity_kwp,
        curtailed_kwh = pv.curtailed_kwh,
        "synthesized daily profile"
    );

    Ok(DailyProfile {
        points,
        curtailed_kwh: pv.curtailed_kwh,
    })
}
