use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::error::{EngineError, Result};

/// Sign of an instantaneous balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceState {
    Surplus,
    Deficit,
    Balanced,
}

/// Magnitude tier of a surplus or deficit, ordered from `None` to `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Moderate,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

impl fmt::Display for BalanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Surplus => "surplus",
            Self::Deficit => "deficit",
            Self::Balanced => "balanced",
        };
        f.write_str(s)
    }
}

/// Classification of one (production, consumption) sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusStatus {
    /// `production - consumption` (kW, signed).
    pub surplus_kw: f64,
    /// Sign of the balance.
    pub status: BalanceState,
    /// Magnitude tier relative to consumption.
    pub severity: Severity,
}

/// Classifies an instantaneous sample.
///
/// `status` is `surplus` above `balance_epsilon_kw`, `deficit` below its
/// negative, `balanced` otherwise. Severity uses
/// `|surplus| / max(consumption, severity_consumption_floor_kw)`:
/// balanced is `none`, below `severity_moderate_ratio` is `low`, below
/// `severity_high_ratio` is `moderate`, anything above is `high`.
///
/// # Arguments
///
/// * `production_kw` - Measured or forecast production
/// * `consumption_kw` - Measured or forecast consumption
/// * `t` - Balance band and severity thresholds
///
/// # Errors
///
/// Returns [`EngineError::InvalidMeasurement`] for negative or non-finite input.
///
/// # Examples
///
/// ```
/// use cel_forecast::config::Thresholds;
/// use cel_forecast::surplus::{BalanceState, Severity, evaluate};
///
/// let s = evaluate(12.0, 4.0, &Thresholds::default()).unwrap();
/// assert_eq!(s.surplus_kw, 8.0);
/// assert_eq!(s.status, BalanceState::Surplus);
/// assert_eq!(s.severity, Severity::High);
/// ```
pub fn evaluate(production_kw: f64, consumption_kw: f64, t: &Thresholds) -> Result<SurplusStatus> {
    for (name, value) in [("productionKw", production_kw), ("consumptionKw", consumption_kw)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(EngineError::InvalidMeasurement(format!(
                "{name} must be a finite value >= 0, got {value}"
            )));
        }
    }

    let surplus_kw = production_kw - consumption_kw;
    let status = if surplus_kw > t.balance_epsilon_kw {
        BalanceState::Surplus
    } else if surplus_kw < -t.balance_epsilon_kw {
        BalanceState::Deficit
    } else {
        BalanceState::Balanced
    };

    let severity = if status == BalanceState::Balanced {
        Severity::None
    } else {
        let ratio = surplus_kw.abs() / consumption_kw.max(t.severity_consumption_floor_kw);
        if ratio >= t.severity_high_ratio {
            Severity::High
        } else if ratio >= t.severity_moderate_ratio {
            Severity::Moderate
        } else {
            Severity::Low
        }
    };

    Ok(SurplusStatus {
        surplus_kw,
        status,
        severity,
    })
}
