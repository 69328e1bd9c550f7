//! Shared timing helpers.
//!
//! Everything here works on caller-supplied timestamps. Nothing reads a
//! clock, so the same code runs on the device and in host tests.

use embassy_time::{Duration, Instant};

/// Time elapsed from `since` to `now`
///
/// Saturates to zero when `now` is earlier than `since`, so a clock that
/// steps backwards reads as "no time passed".
#[inline]
pub fn elapsed_since(now: Instant, since: Instant) -> Duration {
    now.saturating_duration_since(since)
}

/// Fixed-cadence gate for periodic work
///
/// Work is due once strictly more than `period` has passed since the last
/// time the gate was marked.
#[derive(Debug, Clone, Copy)]
pub struct SampleGate {
    period: Duration,
    last: Instant,
}

impl SampleGate {
    /// Create a gate that was last marked at `last`
    pub const fn new(period: Duration, last: Instant) -> Self {
        Self { period, last }
    }

    /// Check whether the period has elapsed at `now`
    ///
    /// A deadline that would overflow the time type is never due.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last.checked_add(self.period) {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    /// Record `now` as the time of the last completed work
    pub fn mark(&mut self, now: Instant) {
        self.last = now;
    }

    /// Time of the last completed work
    pub const fn last(&self) -> Instant {
        self.last
    }

    /// Gate period
    pub const fn period(&self) -> Duration {
        self.period
    }
}
