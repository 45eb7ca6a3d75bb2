use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::forecast::{ForecastPoint, validate_forecast};

/// A contiguous block of hours with positive forecast surplus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalWindow {
    /// First hour of the window (inclusive).
    pub start_hour: u8,
    /// Last hour of the window (inclusive).
    pub end_hour: u8,
    /// Sum of hourly surplus over the window (kWh, > 0).
    pub total_surplus_kwh: f64,
    /// `total_surplus_kwh / length_hours()` (kW, > 0).
    pub avg_surplus_kw: f64,
}

impl OptimalWindow {
    /// Number of hours covered.
    pub fn length_hours(&self) -> u8 {
        self.end_hour - self.start_hour + 1
    }

    /// Whether `hour` falls inside the window.
    pub fn contains(&self, hour: u8) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }
}

/// Merges consecutive hours with `expected_surplus_kw > min_surplus_kw` into windows.
///
/// The day boundary is a hard break: hour 23 never joins hour 0. The result
/// is sorted by descending total surplus, ties broken by earlier start.
/// A negative `min_surplus_kw` is treated as zero so windows only ever hold
/// strictly positive surplus.
///
/// # Arguments
///
/// * `forecast` - The 24-point forecast, ascending by hour
/// * `min_surplus_kw` - Strict lower bound an hour must exceed
///
/// # Errors
///
/// Returns [`EngineError::MalformedForecast`] unless `forecast` holds exactly
/// 24 ordered hours, or if a window total overflows to a non-finite value.
pub fn find_optimal_windows(
    forecast: &[ForecastPoint],
    min_surplus_kw: f64,
) -> Result<Vec<OptimalWindow>> {
    validate_forecast(forecast)?;
    let threshold = min_surplus_kw.max(0.0);

    let mut windows = Vec::new();
    let mut open: Option<(u8, f64)> = None;

    for p in forecast {
        if p.expected_surplus_kw > threshold {
            open.get_or_insert((p.hour, 0.0)).1 += p.expected_surplus_kw;
        } else if let Some((start, total)) = open.take() {
            windows.push(close(start, p.hour - 1, total));
        }
    }
    if let Some((start, total)) = open {
        windows.push(close(start, 23, total));
    }

    if let Some(w) = windows.iter().find(|w| !w.total_surplus_kwh.is_finite()) {
        return Err(EngineError::MalformedForecast(format!(
            "surplus over {:02}:00-{:02}:00 is not finite",
            w.start_hour,
            w.end_hour + 1
        )));
    }

    windows.sort_by(|a, b| {
        b.total_surplus_kwh
            .total_cmp(&a.total_surplus_kwh)
            .then_with(|| a.start_hour.cmp(&b.start_hour))
    });
    Ok(windows)
}

fn close(start_hour: u8, end_hour: u8, total_surplus_kwh: f64) -> OptimalWindow {
    let hours = f64::from(end_hour - start_hour + 1);
    OptimalWindow {
        start_hour,
        end_hour,
        total_surplus_kwh,
        avg_surplus_kw: total_surplus_kwh / hours,
    }
}
