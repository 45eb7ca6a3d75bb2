//! Typed failures surfaced by the forecast engine.

use thiserror::Error;

/// Errors returned by the engine's entry points.
///
/// Every variant is deterministic: the same input always fails the same way,
/// so callers should surface them rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Historical aggregates are negative, non-finite, or carry no capacity.
    #[error("invalid historical data: {0}")]
    InvalidHistoricalData(String),

    /// A forecast sequence is not exactly 24 ordered, gap-free, finite hours.
    #[error("malformed forecast: {0}")]
    MalformedForecast(String),

    /// An instantaneous sample or surplus value is negative or non-finite.
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// An hour of day outside `0..=23`.
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(u8),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;
