//! Hour-of-day sources injected into request handling.
//!
//! The engine itself never reads the wall clock; callers pick the current
//! hour from an [`HourSource`] and pass it in explicitly.

use chrono::{Local, Timelike};

use crate::error::{EngineError, Result};

/// Supplies the current hour of day (0-23).
pub trait HourSource: Send + Sync {
    /// Returns the current hour of day.
    fn current_hour(&self) -> u8;
}

/// Reads the hour from the local system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl HourSource for SystemClock {
    fn current_hour(&self) -> u8 {
        // chrono guarantees 0..=23
        u8::try_from(Local::now().hour()).unwrap_or(0)
    }
}

/// Always reports the same hour.
///
/// # Examples
///
/// ```
/// use cel_forecast::clock::{FixedClock, HourSource};
///
/// let clock = FixedClock::new(14).unwrap();
/// assert_eq!(clock.current_hour(), 14);
/// assert!(FixedClock::new(24).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    hour: u8,
}

impl FixedClock {
    /// Creates a clock pinned to `hour`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HourOutOfRange`] if `hour > 23`.
    pub fn new(hour: u8) -> Result<Self> {
        if hour > 23 {
            return Err(EngineError::HourOutOfRange(hour));
        }
        Ok(Self { hour })
    }
}

impl HourSource for FixedClock {
    fn current_hour(&self) -> u8 {
        self.hour
    }
}
