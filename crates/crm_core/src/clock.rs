//! Injected time source.
//!
//! Services never read the system clock directly so that window and
//! overdue computations are deterministic under test.

use std::time::{SystemTime, UNIX_EPOCH};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of the current instant in Unix epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Start of a trailing window of `days` ending at `now`.
pub fn window_start(now: i64, days: u32) -> i64 {
    now.saturating_sub(i64::from(days).saturating_mul(MS_PER_DAY))
}
