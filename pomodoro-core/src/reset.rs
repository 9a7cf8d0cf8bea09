//! Debounce for the active-low reset button.
//!
//! A falling edge only schedules a resample; the press is confirmed when the
//! line still reads low once the settle time has elapsed. Callers sleep until
//! the returned deadline instead of spinning.

use core::ops::Add;
use core::time::Duration;

use crate::config::DEFAULT_RESET_SETTLE;

/// Result of resampling the reset line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResampleOutcome {
    /// No edge is pending.
    Idle,
    /// The settle deadline has not been reached yet.
    Pending,
    /// The line is still low after settling.
    Confirmed,
    /// The line bounced back high; the edge is discarded.
    Rejected,
}

/// Tracks a single pending reset edge against a monotonic clock.
#[derive(Clone, Debug)]
pub struct ResetSupervisor<Instant> {
    settle: Duration,
    deadline: Option<Instant>,
}

impl<Instant> ResetSupervisor<Instant>
where
    Instant: Copy + Ord,
{
    #[must_use]
    pub const fn new(settle: Duration) -> Self {
        Self {
            settle,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn settle(&self) -> Duration {
        self.settle
    }

    /// Deadline of the pending edge, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` while an edge awaits its resample.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Records a falling edge and returns the resample deadline.
    ///
    /// Edges arriving while one is already pending keep the earlier deadline.
    pub fn on_edge(&mut self, now: Instant) -> Instant
    where
        Instant: Add<Duration, Output = Instant>,
    {
        match self.deadline {
            Some(deadline) => deadline,
            None => {
                let deadline = now + self.settle;
                self.deadline = Some(deadline);
                deadline
            }
        }
    }

    /// Samples the line level. `pressed` is `true` when the line reads low.
    pub fn resample(&mut self, now: Instant, pressed: bool) -> ResampleOutcome {
        let Some(deadline) = self.deadline else {
            return ResampleOutcome::Idle;
        };
        if now < deadline {
            return ResampleOutcome::Pending;
        }

        self.deadline = None;
        if pressed {
            ResampleOutcome::Confirmed
        } else {
            ResampleOutcome::Rejected
        }
    }

    /// Drops any pending edge.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl<Instant> Default for ResetSupervisor<Instant>
where
    Instant: Copy + Ord,
{
    fn default() -> Self {
        Self::new(DEFAULT_RESET_SETTLE)
    }
}
