use serde::{Deserialize, Serialize};
use tracing::debug;

use super::windows::OptimalWindow;
use crate::config::Thresholds;
use crate::error::{EngineError, Result};
use crate::forecast::{ForecastPoint, validate_forecast};

/// How soon a member should act on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Now,
    Soon,
    Later,
}

/// One actionable suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    /// Human-readable action.
    pub action: String,
    /// Window the action refers to, if any.
    pub window_ref: Option<OptimalWindow>,
    /// When to act.
    pub urgency: Urgency,
    /// Energy backing the suggestion (kWh).
    pub confidence_kwh: f64,
}

/// Ranked suggestions for one member; never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Member the suggestions are for.
    pub member_id: String,
    /// Suggestions, most relevant first.
    pub items: Vec<RecommendationItem>,
}

/// Produces a recommendation for one member.
///
/// With `current_surplus_kw` above `min_surplus_kw` the member should run
/// flexible loads now. Otherwise the first window in `windows` (best first)
/// starting after `current_hour` is suggested, `soon` if it starts within
/// `soon_within_hours`, `later` beyond. Without such a window a single
/// `later` item with zero confidence says there is no good time left today.
///
/// # Arguments
///
/// * `member_id` - Member the advice is for
/// * `current_surplus_kw` - Surplus available to the member right now
/// * `current_hour` - Hour of day (0-23) from an injected clock
/// * `forecast` - The 24-point community forecast
/// * `windows` - Optimal windows, best first
/// * `t` - Surplus and urgency thresholds
///
/// # Returns
///
/// A `Recommendation` holding exactly one item.
///
/// # Errors
///
/// Returns [`EngineError::MalformedForecast`] for a bad forecast,
/// [`EngineError::HourOutOfRange`] for `current_hour > 23`, and
/// [`EngineError::InvalidMeasurement`] for a non-finite surplus.
pub fn generate(
    member_id: impl Into<String>,
    current_surplus_kw: f64,
    current_hour: u8,
    forecast: &[ForecastPoint],
    windows: &[OptimalWindow],
    t: &Thresholds,
) -> Result<Recommendation> {
    validate_forecast(forecast)?;
    if current_hour > 23 {
        return Err(EngineError::HourOutOfRange(current_hour));
    }
    if !current_surplus_kw.is_finite() {
        return Err(EngineError::InvalidMeasurement(format!(
            "currentSurplusKw must be finite, got {current_surplus_kw}"
        )));
    }

    let item = if current_surplus_kw > t.min_surplus_kw {
        RecommendationItem {
            action: format!(
                "Run flexible loads now: {current_surplus_kw:.1} kW of surplus available"
            ),
            window_ref: None,
            urgency: Urgency::Now,
            confidence_kwh: current_surplus_kw,
        }
    } else if let Some(w) = windows.iter().find(|w| w.start_hour > current_hour) {
        let urgency = if w.start_hour - current_hour <= t.soon_within_hours {
            Urgency::Soon
        } else {
            Urgency::Later
        };
        RecommendationItem {
            action: format!(
                "Wait for the {:02}:00-{:02}:00 surplus window ({:.1} kWh expected)",
                w.start_hour,
                w.end_hour + 1,
                w.total_surplus_kwh
            ),
            window_ref: Some(*w),
            urgency,
            confidence_kwh: w.total_surplus_kwh,
        }
    } else {
        RecommendationItem {
            action: "No surplus expected for the rest of today".to_string(),
            window_ref: None,
            urgency: Urgency::Later,
            confidence_kwh: 0.0,
        }
    };

    let member_id = member_id.into();
    debug!(
        member_id = %member_id,
        current_hour,
        current_surplus_kw,
        urgency = ?item.urgency,
        "generated recommendation"
    );

    Ok(Recommendation {
        member_id,
        items: vec![item],
    })
}
