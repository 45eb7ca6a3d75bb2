//! Common trait for normalized 24-hour shape curves.

use crate::forecast::HOURS_PER_DAY;

/// A daily curve that distributes one unit of energy over the 24 hours.
///
/// Implementors supply raw non-negative weights; [`ShapeCurve::normalized`]
/// turns them into shares summing to 1.
pub trait ShapeCurve {
    /// Raw weight for `hour` (0..24). Negative values are treated as zero.
    fn weight(&self, hour: usize) -> f64;

    /// Returns a human-readable name for the curve.
    fn curve_type(&self) -> &'static str;

    /// Hourly shares summing to 1, or all zeros if every weight is zero.
    fn normalized(&self) -> [f64; HOURS_PER_DAY] {
        let mut shares = [0.0; HOURS_PER_DAY];
        for (hour, share) in shares.iter_mut().enumerate() {
            *share = self.weight(hour).max(0.0);
        }

        let total: f64 = shares.iter().sum();
        if total > 0.0 {
            for share in &mut shares {
                *share /= total;
            }
        }
        shares
    }
}
