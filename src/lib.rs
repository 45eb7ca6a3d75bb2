//! Community energy forecast and surplus recommendation engine.
//!
//! Turns coarse historical totals for a local energy community into an
//! hourly production/consumption profile, finds the day's surplus windows,
//! classifies instantaneous surplus, and advises members when to run
//! flexible loads. Every computation is a pure function of its inputs.

/// REST API (feature `api`).
#[cfg(feature = "api")]
pub mod api;
/// Injected hour-of-day sources.
pub mod clock;
pub mod config;
pub mod error;
pub mod forecast;
/// Historical aggregation and the persistence seam.
pub mod history;
pub mod io;
/// Daily profile synthesis.
pub mod profile;
pub mod surplus;

pub use error::{EngineError, Result};
pub use forecast::{CommunityForecast, ForecastPoint, HOURS_PER_DAY, compute_forecast};
pub use history::HistoricalData;
