//! Infrared capture decoding shared by firmware and host targets.
//!
//! The capture source hands over one interval at a time, measured in platform
//! ticks between successive falling edges of the receiver output. Each interval
//! is classified into a [`Symbol`]; [`FrameAssembler`] collects 32 data symbols
//! into a [`RawFrame`] and then stops listening until the consumer re-arms it.
//! Nothing here touches hardware, so the same assembler runs inside an
//! interrupt handler, an Embassy task, or the host emulator.

use heapless::Vec;

pub mod nec;

pub use nec::{FrameError, FrameValidation, NecFrame, PulseTiming, RawFrame};

/// Number of data symbols in a complete frame.
pub const FRAME_SYMBOLS: usize = 32;

/// Intervals at or above this many ticks classify as [`Symbol::One`].
pub const DEFAULT_ONE_FROM_TICKS: u32 = 1_700;

/// Intervals at or above this many ticks classify as [`Symbol::Reset`].
pub const DEFAULT_RESET_FROM_TICKS: u32 = 3_000;

/// Classification of one measured capture interval.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Symbol {
    Zero,
    One,
    /// Leader or idle gap; discards any partially collected frame.
    Reset,
}

impl Symbol {
    /// Returns the data bit carried by the symbol, if any.
    #[must_use]
    pub const fn bit(self) -> Option<bool> {
        match self {
            Symbol::Zero => Some(false),
            Symbol::One => Some(true),
            Symbol::Reset => None,
        }
    }
}

/// Tick boundaries separating the three symbol classes.
///
/// The defaults assume a 1 MHz capture clock. A platform running the capture
/// timer at another rate must rescale them with [`PulseThresholds::rescaled`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseThresholds {
    /// Smallest interval that reads as [`Symbol::One`].
    pub one_from: u32,
    /// Smallest interval that reads as [`Symbol::Reset`].
    pub reset_from: u32,
}

impl PulseThresholds {
    /// Thresholds calibrated for a 1 MHz capture clock.
    pub const DEFAULT: Self = Self::new(DEFAULT_ONE_FROM_TICKS, DEFAULT_RESET_FROM_TICKS);

    #[must_use]
    pub const fn new(one_from: u32, reset_from: u32) -> Self {
        Self {
            one_from,
            reset_from,
        }
    }

    /// Classifies a single interval.
    #[must_use]
    pub const fn classify(&self, ticks: u32) -> Symbol {
        if ticks < self.one_from {
            Symbol::Zero
        } else if ticks < self.reset_from {
            Symbol::One
        } else {
            Symbol::Reset
        }
    }

    /// Rescales the thresholds from one capture clock rate to another.
    #[must_use]
    pub fn rescaled(&self, from_hz: u32, to_hz: u32) -> Self {
        Self {
            one_from: scale_ticks(self.one_from, from_hz, to_hz),
            reset_from: scale_ticks(self.reset_from, from_hz, to_hz),
        }
    }
}

impl Default for PulseThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn scale_ticks(ticks: u32, from_hz: u32, to_hz: u32) -> u32 {
    if from_hz == 0 {
        return ticks;
    }
    let scaled = u64::from(ticks) * u64::from(to_hz) / u64::from(from_hz);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Classifies an interval using the default 1 MHz thresholds.
#[must_use]
pub const fn classify(ticks: u32) -> Symbol {
    PulseThresholds::DEFAULT.classify(ticks)
}

/// Result of feeding one interval into the [`FrameAssembler`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaptureOutcome {
    /// A data symbol was appended; `count` symbols are now buffered.
    Accepted { symbol: Symbol, count: usize },
    /// A reset symbol discarded `dropped` partially collected symbols.
    Discarded { dropped: usize },
    /// The 32nd symbol arrived. The assembler is disarmed until re-armed.
    FrameReady,
    /// The assembler is disarmed and ignored the interval.
    Ignored,
}

/// Collects classified symbols into 32-symbol frames.
///
/// Once a frame completes the assembler stops accepting intervals. The consumer
/// copies the frame out with [`FrameAssembler::take_frame`] and resumes capture
/// with [`FrameAssembler::rearm`]; anything that arrives in between is dropped.
#[derive(Clone, Debug)]
pub struct FrameAssembler {
    thresholds: PulseThresholds,
    symbols: Vec<Symbol, FRAME_SYMBOLS>,
    armed: bool,
}

impl FrameAssembler {
    /// Creates an armed assembler with an empty buffer.
    #[must_use]
    pub const fn new(thresholds: PulseThresholds) -> Self {
        Self {
            thresholds,
            symbols: Vec::new(),
            armed: true,
        }
    }

    /// Returns the thresholds used for classification.
    #[must_use]
    pub const fn thresholds(&self) -> PulseThresholds {
        self.thresholds
    }

    /// Feeds one measured interval into the assembler.
    pub fn push_interval(&mut self, ticks: u32) -> CaptureOutcome {
        if !self.armed {
            return CaptureOutcome::Ignored;
        }

        let symbol = self.thresholds.classify(ticks);
        if symbol == Symbol::Reset {
            let dropped = self.symbols.len();
            self.symbols.clear();
            return CaptureOutcome::Discarded { dropped };
        }

        if self.symbols.push(symbol).is_err() || self.symbols.is_full() {
            self.armed = false;
            return CaptureOutcome::FrameReady;
        }

        CaptureOutcome::Accepted {
            symbol,
            count: self.symbols.len(),
        }
    }

    /// Returns `true` while the assembler accepts intervals.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Returns the number of buffered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` when no symbols are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns `true` when a complete frame is waiting to be consumed.
    #[must_use]
    pub fn is_frame_ready(&self) -> bool {
        !self.armed && self.symbols.is_full()
    }

    /// Copies out the completed frame, leaving the assembler disarmed.
    #[must_use]
    pub fn take_frame(&self) -> Option<RawFrame> {
        if self.is_frame_ready() {
            RawFrame::from_symbols(&self.symbols)
        } else {
            None
        }
    }

    /// Clears the buffer and resumes accepting intervals.
    pub fn rearm(&mut self) {
        self.symbols.clear();
        self.armed = true;
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(PulseThresholds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify(0), Symbol::Zero);
        assert_eq!(classify(1_699), Symbol::Zero);
        assert_eq!(classify(1_700), Symbol::One);
        assert_eq!(classify(2_999), Symbol::One);
        assert_eq!(classify(3_000), Symbol::Reset);
        assert_eq!(classify(u32::MAX), Symbol::Reset);
    }

    #[test]
    fn rescaled_thresholds_follow_clock_rate() {
        let doubled = PulseThresholds::DEFAULT.rescaled(1_000_000, 2_000_000);
        assert_eq!(doubled, PulseThresholds::new(3_400, 6_000));
        assert_eq!(doubled.classify(3_399), Symbol::Zero);
    }

    #[test]
    fn reset_discards_partial_frame() {
        let mut assembler = FrameAssembler::default();
        for _ in 0..5 {
            assembler.push_interval(1_125);
        }
        assert_eq!(assembler.len(), 5);

        assert_eq!(
            assembler.push_interval(13_500),
            CaptureOutcome::Discarded { dropped: 5 }
        );
        assert!(assembler.is_empty());
        assert!(assembler.is_armed());
    }

    #[test]
    fn thirty_second_symbol_disarms_and_later_intervals_are_ignored() {
        let mut assembler = FrameAssembler::default();
        for index in 0..31 {
            let outcome = assembler.push_interval(2_250);
            assert_eq!(
                outcome,
                CaptureOutcome::Accepted {
                    symbol: Symbol::One,
                    count: index + 1
                }
            );
        }

        assert_eq!(assembler.push_interval(1_125), CaptureOutcome::FrameReady);
        assert!(!assembler.is_armed());
        assert!(assembler.is_frame_ready());

        assert_eq!(assembler.push_interval(13_500), CaptureOutcome::Ignored);
        assert_eq!(assembler.push_interval(1_125), CaptureOutcome::Ignored);
        assert_eq!(assembler.len(), FRAME_SYMBOLS);

        let frame = assembler.take_frame().expect("frame should be ready");
        assert_eq!(frame.bits(), 0xFFFF_FFFE);
    }

    #[test]
    fn rearm_clears_buffer() {
        let mut assembler = FrameAssembler::default();
        for _ in 0..FRAME_SYMBOLS {
            assembler.push_interval(1_000);
        }
        assert!(assembler.take_frame().is_some());

        assembler.rearm();
        assert!(assembler.is_armed());
        assert!(assembler.is_empty());
        assert!(assembler.take_frame().is_none());
    }
}
