use std::f64::consts::PI;

use tracing::warn;

use super::shape::ShapeCurve;
use crate::config::ProductionConfig;
use crate::forecast::HOURS_PER_DAY;

/// A bell-shaped solar production curve over the daylight window.
///
/// `SolarBell` allocates weight as a half-sine between sunrise and sunset,
/// zero outside, symmetric about solar noon.
#[derive(Debug, Clone, Copy)]
pub struct SolarBell {
    /// Hour at which the curve rises from zero (zero weight itself).
    pub sunrise_hour: usize,

    /// Hour at which the curve returns to zero (zero weight itself).
    pub sunset_hour: usize,
}

impl SolarBell {
    /// Creates a curve for the given daylight window.
    ///
    /// A window with `sunset_hour <= sunrise_hour + 1` has no positive hour
    /// and yields an all-zero curve.
    pub fn new(sunrise_hour: usize, sunset_hour: usize) -> Self {
        Self {
            sunrise_hour,
            sunset_hour: sunset_hour.min(HOURS_PER_DAY),
        }
    }
}

impl From<&ProductionConfig> for SolarBell {
    fn from(cfg: &ProductionConfig) -> Self {
        Self::new(usize::from(cfg.sunrise_hour), usize::from(cfg.sunset_hour))
    }
}

impl ShapeCurve for SolarBell {
    fn weight(&self, hour: usize) -> f64 {
        if hour <= self.sunrise_hour || hour >= self.sunset_hour {
            return 0.0;
        }
        let span = (self.sunset_hour - self.sunrise_hour) as f64;
        let pos = (hour - self.sunrise_hour) as f64 / span;
        (PI * pos).sin()
    }

    fn curve_type(&self) -> &'static str {
        "SolarBell"
    }
}

/// Hourly production scaled to a daily total and bounded by capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionProfile {
    /// Production per hour (kW), index = hour.
    pub hourly_kw: [f64; HOURS_PER_DAY],
    /// Energy that could not be placed without exceeding capacity (kWh).
    pub curtailed_kwh: f64,
}

/// Scales `shape` to `daily_kwh` while keeping every hour at or below `capacity_kw`.
///
/// Hours that would exceed capacity are pinned at capacity and their excess
/// is redistributed over the remaining daylight hours in proportion to their
/// shares, until no hour exceeds capacity. Energy left over once every
/// daylight hour is pinned is reported as curtailed.
///
/// # Arguments
///
/// * `shape` - Daylight weight curve
/// * `daily_kwh` - Energy to distribute over the day
/// * `capacity_kw` - Per-hour upper bound
///
/// # Returns
///
/// Hourly production plus the curtailed remainder.
pub fn production_profile(
    shape: &impl ShapeCurve,
    daily_kwh: f64,
    capacity_kw: f64,
) -> ProductionProfile {
    let shares = shape.normalized();
    let mut hourly_kw = [0.0; HOURS_PER_DAY];
    let mut free: Vec<usize> = (0..HOURS_PER_DAY).filter(|&h| shares[h] > 0.0).collect();
    let mut remaining = daily_kwh.max(0.0);

    while remaining > 0.0 && !free.is_empty() {
        let mass: f64 = free.iter().map(|&h| shares[h]).sum();
        let scale = remaining / mass;
        let (over, under): (Vec<usize>, Vec<usize>) = free
            .into_iter()
            .partition(|&h| shares[h] * scale > capacity_kw);

        if over.is_empty() {
            for h in under {
                hourly_kw[h] = shares[h] * scale;
            }
            remaining = 0.0;
            break;
        }

        for h in over {
            hourly_kw[h] = capacity_kw;
            remaining -= capacity_kw;
        }
        free = under;
    }

    let curtailed_kwh = remaining.max(0.0);
    if curtailed_kwh > 0.0 {
        warn!(
            curve = shape.curve_type(),
            daily_kwh, capacity_kw, curtailed_kwh, "production exceeds installed capacity"
        );
    }

    ProductionProfile {
        hourly_kw,
        curtailed_kwh,
    }
}
