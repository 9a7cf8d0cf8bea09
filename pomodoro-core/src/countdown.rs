//! One-second countdown driving the Running phase.

use core::fmt;

use crate::minutes::MinuteValue;

/// Seconds before the end of each minute at which the buzzer is asserted.
pub const BUZZER_BEEP_DURATION: u8 = 3;

/// Alternating intervals of the Running phase.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubPhase {
    Focus,
    Rest,
}

impl SubPhase {
    /// The interval that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            SubPhase::Focus => SubPhase::Rest,
            SubPhase::Rest => SubPhase::Focus,
        }
    }

    /// Banner shown on the first display row while counting down.
    #[must_use]
    pub const fn banner(self) -> &'static str {
        match self {
            SubPhase::Focus => "FOCUS!",
            SubPhase::Rest => "REST!",
        }
    }
}

impl fmt::Display for SubPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubPhase::Focus => f.write_str("focus"),
            SubPhase::Rest => f.write_str("rest"),
        }
    }
}

/// What a single tick did to the countdown.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    /// The countdown is not active; nothing changed.
    Idle,
    /// Time was decremented. `buzzer_asserted` is set on the tick that armed the buzzer.
    Counting { buzzer_asserted: bool },
    /// The countdown reached 00:00 and went inactive.
    Expired,
}

/// Remaining time for the active sub-phase.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Countdown {
    minutes: u8,
    seconds: u8,
    active: bool,
    buzzer_armed: bool,
}

impl Countdown {
    /// Inactive countdown at 00:00 with the buzzer released.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            active: false,
            buzzer_armed: false,
        }
    }

    /// Starts counting down from `minutes`:00 and clears the buzzer flag.
    pub fn load(&mut self, minutes: MinuteValue) {
        self.minutes = minutes.minutes();
        self.seconds = 0;
        self.active = true;
        self.buzzer_armed = false;
    }

    /// Applies one 1 Hz tick.
    ///
    /// `beep_at_second` is the seconds value (`60 - lead`) at which the buzzer
    /// is asserted; it stays asserted until the next [`Countdown::load`].
    pub fn tick(&mut self, beep_at_second: u8) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }

        if self.seconds > 0 {
            let buzzer_asserted = self.seconds == beep_at_second;
            if buzzer_asserted {
                self.buzzer_armed = true;
            }
            self.seconds -= 1;
            TickOutcome::Counting { buzzer_asserted }
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
            TickOutcome::Counting {
                buzzer_asserted: false,
            }
        } else {
            self.active = false;
            TickOutcome::Expired
        }
    }

    #[must_use]
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    #[must_use]
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn buzzer_armed(&self) -> bool {
        self.buzzer_armed
    }

    /// Inactive with no time left.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        !self.active && self.minutes == 0 && self.seconds == 0
    }

    /// Remaining time in seconds.
    #[must_use]
    pub fn remaining_seconds(&self) -> u16 {
        u16::from(self.minutes) * 60 + u16::from(self.seconds)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::idle()
    }
}

/// Formats as `MM:SS`.
impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}
