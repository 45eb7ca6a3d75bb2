use super::shape::ShapeCurve;
use crate::config::ConsumptionConfig;
use crate::forecast::HOURS_PER_DAY;

/// A household consumption curve with morning and evening peaks.
///
/// `TwoPeakLoad` combines a flat base with two Gaussian bumps, which leaves a
/// trough during the day and a deeper one at night.
///
/// # Examples
///
/// ```
/// use cel_forecast::config::ConsumptionConfig;
/// use cel_forecast::profile::{ShapeCurve, TwoPeakLoad};
///
/// let load = TwoPeakLoad::from(&ConsumptionConfig::default());
/// // Evening peak outweighs the midday trough
/// assert!(load.weight(19) > load.weight(13));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TwoPeakLoad {
    /// Flat weight shared by every hour.
    pub base_weight: f64,
    /// Centre and height of the morning bump.
    pub morning: (f64, f64),
    /// Centre and height of the evening bump.
    pub evening: (f64, f64),
    /// Standard deviation of both bumps (hours).
    pub width_hours: f64,
}

impl From<&ConsumptionConfig> for TwoPeakLoad {
    fn from(cfg: &ConsumptionConfig) -> Self {
        Self {
            base_weight: cfg.base_weight,
            morning: (cfg.morning_peak_hour, cfg.morning_weight),
            evening: (cfg.evening_peak_hour, cfg.evening_weight),
            width_hours: cfg.peak_width_hours,
        }
    }
}

impl TwoPeakLoad {
    fn bump(&self, hour: f64, (centre, height): (f64, f64)) -> f64 {
        let z = (hour - centre) / self.width_hours;
        height * (-0.5 * z * z).exp()
    }
}

impl ShapeCurve for TwoPeakLoad {
    fn weight(&self, hour: usize) -> f64 {
        let h = hour as f64;
        self.base_weight + self.bump(h, self.morning) + self.bump(h, self.evening)
    }

    fn curve_type(&self) -> &'static str {
        "TwoPeakLoad"
    }
}

/// Scales `shape` so the 24 hourly values sum to `daily_kwh`.
pub fn consumption_profile(shape: &impl ShapeCurve, daily_kwh: f64) -> [f64; HOURS_PER_DAY] {
    let mut hourly_kw = shape.normalized();
    let daily_kwh = daily_kwh.max(0.0);
    for kw in &mut hourly_kw {
        *kw *= daily_kwh;
    }
    hourly_kw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load() -> TwoPeakLoad {
        TwoPeakLoad::from(&ConsumptionConfig::default())
    }

    #[test]
    fn every_hour_is_positive() {
        let l = load();
        for h in 0..HOURS_PER_DAY {
            assert!(l.weight(h) >= l.base_weight);
        }
    }

    #[test]
    fn peaks_and_troughs_fall_where_expected() {
        let shares = load().normalized();
        let morning_max = (6..=10).max_by(|&a, &b| shares[a].total_cmp(&shares[b]));
        let evening_max = (17..=22).max_by(|&a, &b| shares[a].total_cmp(&shares[b]));
        assert_eq!(morning_max, Some(8));
        assert!(matches!(evening_max, Some(19 | 20)));

        // Daytime trough sits below both peaks, night sits lowest
        assert!(shares[13] < shares[8]);
        assert!(shares[13] < shares[19]);
        assert!(shares[3] <= shares[13]);
    }

    #[test]
    fn profile_sums_to_daily_total() {
        let hourly = consumption_profile(&load(), 100.0);
        let total: f64 = hourly.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_consumption_is_all_zero() {
        let hourly = consumption_profile(&load(), 0.0);
        assert!(hourly.iter().all(|&kw| kw == 0.0));
    }
}
