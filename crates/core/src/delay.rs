// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delay parsing and normalization for the timeout scheduler
//!
//! Callers express delays as whole seconds, fractional seconds, or numeric
//! text. Parsing validates the value; normalization picks one of the two
//! timer resolutions. Coarse whole-second timers are cheap to maintain at
//! scale and may be coalesced by the host loop; exact millisecond timers
//! cost more but honor sub-second delays.

use std::time::Duration;

use crate::error::TimeoutError;

/// Largest magnitude a timer arming accepts, in either resolution.
pub const MAX_MAGNITUDE: u32 = u32::MAX;

/// A delay as supplied by a caller, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Delay {
    /// Whole seconds; negative values are rejected at parse time
    Secs(i64),
    /// Fractional seconds
    SecsF(f64),
    /// Numeric text, for convenience ("30", "0.5")
    Text(String),
}

impl Delay {
    /// Validate the raw value.
    ///
    /// Text parses as an integer first, then as a float. Negative values,
    /// non-numeric text and non-finite floats fail with
    /// [`TimeoutError::InvalidTimeout`].
    pub fn parse(&self) -> Result<DelayValue, TimeoutError> {
        match self {
            Delay::Secs(n) if *n >= 0 => Ok(DelayValue::Whole(*n as u64)),
            Delay::SecsF(f) if f.is_finite() && *f >= 0.0 => Ok(DelayValue::Fract(*f)),
            Delay::Text(s) => {
                if let Ok(n) = s.trim().parse::<i64>() {
                    Delay::Secs(n).parse()
                } else if let Ok(f) = s.trim().parse::<f64>() {
                    Delay::SecsF(f).parse()
                } else {
                    Err(TimeoutError::InvalidTimeout(s.clone()))
                }
            }
            Delay::Secs(n) => Err(TimeoutError::InvalidTimeout(n.to_string())),
            Delay::SecsF(f) => Err(TimeoutError::InvalidTimeout(f.to_string())),
        }
    }
}

impl From<i64> for Delay {
    fn from(secs: i64) -> Self {
        Delay::Secs(secs)
    }
}

impl From<i32> for Delay {
    fn from(secs: i32) -> Self {
        Delay::Secs(secs.into())
    }
}

impl From<u32> for Delay {
    fn from(secs: u32) -> Self {
        Delay::Secs(secs.into())
    }
}

impl From<f64> for Delay {
    fn from(secs: f64) -> Self {
        Delay::SecsF(secs)
    }
}

impl From<&str> for Delay {
    fn from(text: &str) -> Self {
        Delay::Text(text.to_string())
    }
}

impl From<String> for Delay {
    fn from(text: String) -> Self {
        Delay::Text(text)
    }
}

/// A validated delay, before resolution is chosen.
///
/// The cancel-on-zero policy tests this parsed value, not the clamped
/// magnitude, so an exact zero stays observable even though millisecond
/// arming floors to 1ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayValue {
    Whole(u64),
    Fract(f64),
}

impl DelayValue {
    pub fn is_zero(self) -> bool {
        match self {
            DelayValue::Whole(n) => n == 0,
            DelayValue::Fract(f) => f == 0.0,
        }
    }

    /// Normalize to a timer arming: milliseconds when `exact` was requested
    /// or the value is fractional, whole seconds otherwise. Millisecond
    /// magnitudes are floored to 1 and both resolutions cap at
    /// [`MAX_MAGNITUDE`].
    pub fn to_timer(self, exact: bool) -> TimerDelay {
        match self {
            DelayValue::Fract(f) => TimerDelay::Millis(clamp_millis(f * 1000.0)),
            DelayValue::Whole(n) if exact => TimerDelay::Millis(clamp_millis(n as f64 * 1000.0)),
            DelayValue::Whole(n) => TimerDelay::Seconds(n.min(MAX_MAGNITUDE as u64) as u32),
        }
    }
}

fn clamp_millis(ms: f64) -> u32 {
    if ms < 1.0 {
        1
    } else if ms > MAX_MAGNITUDE as f64 {
        MAX_MAGNITUDE
    } else {
        ms as u32
    }
}

/// A normalized timer arming, ready for the timer primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDelay {
    /// Coarse resolution; the host loop may coalesce these
    Seconds(u32),
    /// Exact resolution
    Millis(u32),
}

impl TimerDelay {
    pub fn duration(self) -> Duration {
        match self {
            TimerDelay::Seconds(s) => Duration::from_secs(s.into()),
            TimerDelay::Millis(ms) => Duration::from_millis(ms.into()),
        }
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
