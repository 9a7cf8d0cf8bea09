//! Monotonic instant handed to the shared core.
//!
//! `pomodoro-core` is generic over its clock and expects `core::time::Duration`
//! arithmetic, while Embassy uses its own tick-based `Duration`. The wrapper
//! bridges the two so telemetry and reset debounce run on `embassy_time`.

use core::ops::Add;

use embassy_time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FirmwareInstant(Instant);

impl FirmwareInstant {
    #[cfg(target_os = "none")]
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub const fn into_embassy(self) -> Instant {
        self.0
    }

    pub fn as_micros(self) -> u64 {
        self.0.as_micros()
    }

    /// Microseconds elapsed since `earlier`, saturating at `u32::MAX`.
    pub fn micros_since(self, earlier: Self) -> u32 {
        let elapsed = self.0.saturating_duration_since(earlier.0).as_micros();
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}

impl From<Instant> for FirmwareInstant {
    fn from(value: Instant) -> Self {
        Self(value)
    }
}

impl Add<core::time::Duration> for FirmwareInstant {
    type Output = Self;

    fn add(self, rhs: core::time::Duration) -> Self::Output {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        Self(
            self.0
                .checked_add(Duration::from_micros(micros))
                .unwrap_or(Instant::MAX),
        )
    }
}
