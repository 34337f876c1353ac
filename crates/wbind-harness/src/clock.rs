#![forbid(unsafe_code)]

//! Deterministic frame clock.
//!
//! Tests never sleep. A `FrameClock` starts at a fixed origin and only moves
//! when told to, so settle delays are exercised exactly.

use web_time::{Duration, Instant};

/// Manually advanced clock.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
    now: Instant,
}

impl FrameClock {
    /// Start at the current instant.
    #[must_use]
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            now: origin,
        }
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance by `ms` milliseconds and return the new time.
    pub fn advance_ms(&mut self, ms: u64) -> Instant {
        self.advance(Duration::from_millis(ms))
    }

    /// Advance by `by` and return the new time.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    /// Time since the origin.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.now.saturating_duration_since(self.origin)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
