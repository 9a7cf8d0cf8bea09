//! Static configuration shared by firmware and host targets.

use core::{fmt, time::Duration};

use crate::countdown::BUZZER_BEEP_DURATION;
use crate::ir::{FrameValidation, PulseThresholds, PulseTiming, Symbol};
use crate::minutes::MinuteValue;

/// Time the reset line must stay low before a press is confirmed.
pub const DEFAULT_RESET_SETTLE: Duration = Duration::from_millis(20);

/// Timer configuration validated once at start-up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TimerConfig {
    pub thresholds: PulseThresholds,
    /// Nominal intervals used when synthesizing frames.
    pub pulse_timing: PulseTiming,
    /// Seconds before the end of a minute at which the buzzer is asserted.
    pub beep_lead_seconds: u8,
    pub reset_settle: Duration,
    pub frame_validation: FrameValidation,
    pub default_focus: MinuteValue,
    pub default_rest: MinuteValue,
}

impl TimerConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            thresholds: PulseThresholds::DEFAULT,
            pulse_timing: PulseTiming::DEFAULT,
            beep_lead_seconds: BUZZER_BEEP_DURATION,
            reset_settle: DEFAULT_RESET_SETTLE,
            frame_validation: FrameValidation::Lenient,
            default_focus: MinuteValue::ONE,
            default_rest: MinuteValue::ONE,
        }
    }

    #[must_use]
    pub const fn with_frame_validation(mut self, frame_validation: FrameValidation) -> Self {
        self.frame_validation = frame_validation;
        self
    }

    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: PulseThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub const fn with_reset_settle(mut self, reset_settle: Duration) -> Self {
        self.reset_settle = reset_settle;
        self
    }

    /// Seconds value at which a countdown tick asserts the buzzer.
    #[must_use]
    pub const fn beep_second(&self) -> u8 {
        60u8.saturating_sub(self.beep_lead_seconds)
    }

    /// Checks internal consistency of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let PulseThresholds {
            one_from,
            reset_from,
        } = self.thresholds;
        if one_from == 0 || reset_from == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if one_from >= reset_from {
            return Err(ConfigError::ThresholdOrder {
                one_from,
                reset_from,
            });
        }

        if self.beep_lead_seconds == 0 || self.beep_lead_seconds >= 60 {
            return Err(ConfigError::BeepLeadOutOfRange(self.beep_lead_seconds));
        }

        let timing = self.pulse_timing;
        if self.thresholds.classify(timing.leader) != Symbol::Reset
            || self.thresholds.classify(timing.zero) != Symbol::Zero
            || self.thresholds.classify(timing.one) != Symbol::One
        {
            return Err(ConfigError::TimingMisclassified);
        }

        if self.reset_settle.is_zero() {
            return Err(ConfigError::ZeroResetSettle);
        }

        Ok(())
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reasons a [`TimerConfig`] is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    ZeroThreshold,
    ThresholdOrder { one_from: u32, reset_from: u32 },
    BeepLeadOutOfRange(u8),
    /// The synthesis timing does not round-trip through the thresholds.
    TimingMisclassified,
    ZeroResetSettle,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroThreshold => f.write_str("pulse thresholds must be non-zero"),
            ConfigError::ThresholdOrder {
                one_from,
                reset_from,
            } => write!(
                f,
                "one threshold {one_from} must be below reset threshold {reset_from}"
            ),
            ConfigError::BeepLeadOutOfRange(lead) => {
                write!(f, "beep lead {lead}s must be within 1..=59")
            }
            ConfigError::TimingMisclassified => {
                f.write_str("pulse timing does not classify under the configured thresholds")
            }
            ConfigError::ZeroResetSettle => f.write_str("reset settle time must be non-zero"),
        }
    }
}
