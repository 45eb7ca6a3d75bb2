//! Surplus analysis: optimal windows, instantaneous status, and recommendations.

/// Member recommendation generator.
pub mod recommend;
/// Instantaneous surplus classification.
pub mod status;
pub mod summary;
/// Contiguous positive-surplus window detection.
pub mod windows;

pub use recommend::{Recommendation, RecommendationItem, Urgency, generate};
pub use status::{BalanceState, Severity, SurplusStatus, evaluate};
pub use summary::ForecastSummary;
pub use windows::{OptimalWindow, find_optimal_windows};
