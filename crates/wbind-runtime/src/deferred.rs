#![forbid(unsafe_code)]

//! Deferred auto-size after a surface transition.
//!
//! A transition between inline and overlay commits before the host surface
//! has finished laying out. The auto-size is therefore queued and fired once
//! `settle_delay` has elapsed on the host's frame clock. Nothing sleeps: the
//! host drives the queue through `tick_at(now)` and can ask for
//! `time_until_due(now)` to plan its next wake-up.
//!
//! # Invariants
//!
//! 1. At most one auto-size is pending; a newer transition reschedules it.
//! 2. A due entry is handed out exactly once.
//! 3. The queue never inspects the widget; callers validate the token.

use web_time::{Duration, Instant};

use crate::host::HandleToken;

/// A due auto-size, returned by [`SettleQueue::tick_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueAutoSize {
    /// Handle the auto-size was scheduled for.
    pub token: HandleToken,
    /// Time since scheduling.
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: HandleToken,
    scheduled_at: Instant,
}

/// Single-slot queue for the settle-delayed auto-size.
#[derive(Debug)]
pub struct SettleQueue {
    delay: Duration,
    pending: Option<Pending>,
}

impl SettleQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured settle delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue an auto-size for `token`, replacing any pending one.
    pub fn schedule_at(&mut self, token: HandleToken, now: Instant) {
        self.pending = Some(Pending {
            token,
            scheduled_at: now,
        });
    }

    /// Pop the pending auto-size if its delay has elapsed.
    pub fn tick_at(&mut self, now: Instant) -> Option<DueAutoSize> {
        let pending = self.pending?;
        let elapsed = now.saturating_duration_since(pending.scheduled_at);
        if elapsed < self.delay {
            return None;
        }
        self.pending = None;
        Some(DueAutoSize {
            token: pending.token,
            elapsed,
        })
    }

    /// Remaining wait for the pending auto-size, if any.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        let pending = self.pending?;
        let elapsed = now.saturating_duration_since(pending.scheduled_at);
        Some(self.delay.saturating_sub(elapsed))
    }

    /// Whether an auto-size is queued.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
