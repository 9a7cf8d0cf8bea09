//! Frame layout for the remote's 32-bit pulse-distance protocol.
//!
//! A frame carries four bytes in transmission order: address, address
//! complement, command, command complement. Bytes are packed MSB-first from
//! the order in which the symbols arrived, which is the byte value the
//! [`crate::remote`] table is keyed on.

use core::fmt;

use super::{FRAME_SYMBOLS, Symbol};

/// 32 data symbols packed into a word, first symbol in the most significant bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RawFrame(u32);

impl RawFrame {
    /// Wraps a pre-packed frame word.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Packs exactly 32 data symbols. Returns `None` for any other length or
    /// when a [`Symbol::Reset`] is present.
    #[must_use]
    pub fn from_symbols(symbols: &[Symbol]) -> Option<Self> {
        if symbols.len() != FRAME_SYMBOLS {
            return None;
        }

        let mut bits = 0u32;
        for symbol in symbols {
            bits = (bits << 1) | u32::from(symbol.bit()?);
        }
        Some(Self(bits))
    }

    /// Returns the packed word.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the symbol at `index` in arrival order.
    #[must_use]
    pub const fn symbol(self, index: usize) -> Option<Symbol> {
        if index >= FRAME_SYMBOLS {
            return None;
        }
        let shift = FRAME_SYMBOLS - 1 - index;
        if (self.0 >> shift) & 1 == 1 {
            Some(Symbol::One)
        } else {
            Some(Symbol::Zero)
        }
    }

    /// Leader interval followed by one interval per symbol.
    #[must_use]
    pub fn to_intervals(self, timing: &PulseTiming) -> [u32; FRAME_SYMBOLS + 1] {
        let mut intervals = [timing.leader; FRAME_SYMBOLS + 1];
        for (index, slot) in intervals.iter_mut().skip(1).enumerate() {
            *slot = match self.symbol(index) {
                Some(Symbol::One) => timing.one,
                _ => timing.zero,
            };
        }
        intervals
    }

    /// Splits the frame into its four byte groups.
    #[must_use]
    pub const fn decode(self) -> NecFrame {
        let [address, address_complement, command, command_complement] = self.0.to_be_bytes();
        NecFrame {
            address,
            address_complement,
            command,
            command_complement,
        }
    }
}

/// Byte groups of a decoded frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NecFrame {
    pub address: u8,
    pub address_complement: u8,
    pub command: u8,
    pub command_complement: u8,
}

impl NecFrame {
    /// Builds a well-formed frame whose complement bytes match.
    #[must_use]
    pub const fn new(address: u8, command: u8) -> Self {
        Self {
            address,
            address_complement: !address,
            command,
            command_complement: !command,
        }
    }

    /// Builds a frame from four arbitrary bytes.
    #[must_use]
    pub const fn from_bytes(
        address: u8,
        address_complement: u8,
        command: u8,
        command_complement: u8,
    ) -> Self {
        Self {
            address,
            address_complement,
            command,
            command_complement,
        }
    }

    /// Packs the frame back into arrival order.
    #[must_use]
    pub const fn to_raw(self) -> RawFrame {
        RawFrame(u32::from_be_bytes([
            self.address,
            self.address_complement,
            self.command,
            self.command_complement,
        ]))
    }

    #[must_use]
    pub const fn address_matches_complement(&self) -> bool {
        self.address == !self.address_complement
    }

    #[must_use]
    pub const fn command_matches_complement(&self) -> bool {
        self.command == !self.command_complement
    }

    /// Applies the configured complement policy.
    pub fn validate(self, policy: FrameValidation) -> Result<Self, FrameError> {
        if policy == FrameValidation::Lenient {
            return Ok(self);
        }
        if !self.address_matches_complement() {
            return Err(FrameError::AddressMismatch {
                address: self.address,
                complement: self.address_complement,
            });
        }
        if !self.command_matches_complement() {
            return Err(FrameError::CommandMismatch {
                command: self.command,
                complement: self.command_complement,
            });
        }
        Ok(self)
    }

    /// Synthesizes the capture intervals a receiver would report for this
    /// frame: one leader interval followed by one interval per data bit.
    #[must_use]
    pub fn to_intervals(&self, timing: &PulseTiming) -> [u32; FRAME_SYMBOLS + 1] {
        self.to_raw().to_intervals(timing)
    }
}

/// Whether the complement bytes of a frame are checked.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FrameValidation {
    /// Accept any syntactically complete frame.
    #[default]
    Lenient,
    /// Reject frames whose address or command does not match its complement.
    Strict,
}

/// Complement check failures reported under [`FrameValidation::Strict`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FrameError {
    AddressMismatch { address: u8, complement: u8 },
    CommandMismatch { command: u8, complement: u8 },
}

impl FrameError {
    /// Command byte carried by the rejected frame, for diagnostics.
    #[must_use]
    pub const fn command_hint(self) -> Option<u8> {
        match self {
            FrameError::AddressMismatch { .. } => None,
            FrameError::CommandMismatch { command, .. } => Some(command),
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::AddressMismatch {
                address,
                complement,
            } => write!(
                f,
                "address {address:#04x} does not match complement {complement:#04x}"
            ),
            FrameError::CommandMismatch {
                command,
                complement,
            } => write!(
                f,
                "command {command:#04x} does not match complement {complement:#04x}"
            ),
        }
    }
}

/// Nominal interval lengths, in capture ticks, used to synthesize frames.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseTiming {
    pub leader: u32,
    pub zero: u32,
    pub one: u32,
}

impl PulseTiming {
    /// Nominal 1 MHz timing: 13.5 ms leader, 1.125 ms zero, 2.25 ms one.
    pub const DEFAULT: Self = Self::new(13_500, 1_125, 2_250);

    #[must_use]
    pub const fn new(leader: u32, zero: u32, one: u32) -> Self {
        Self { leader, zero, one }
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CaptureOutcome, FrameAssembler};

    #[test]
    fn decode_splits_groups_msb_first() {
        let frame = RawFrame::from_bits(0x00FF_38C7).decode();
        assert_eq!(frame, NecFrame::from_bytes(0x00, 0xFF, 0x38, 0xC7));
        assert!(frame.command_matches_complement());
    }

    #[test]
    fn from_symbols_rejects_reset_and_short_input() {
        let mut symbols = [Symbol::Zero; FRAME_SYMBOLS];
        assert!(RawFrame::from_symbols(&symbols).is_some());
        assert!(RawFrame::from_symbols(&symbols[..31]).is_none());

        symbols[4] = Symbol::Reset;
        assert!(RawFrame::from_symbols(&symbols).is_none());
    }

    #[test]
    fn synthesized_intervals_reassemble_into_same_frame() {
        let frame = NecFrame::new(0x00, 0xA2);
        let mut assembler = FrameAssembler::default();
        let mut outcome = CaptureOutcome::Ignored;
        for ticks in frame.to_intervals(&PulseTiming::DEFAULT) {
            outcome = assembler.push_interval(ticks);
        }

        assert_eq!(outcome, CaptureOutcome::FrameReady);
        assert_eq!(assembler.take_frame().map(RawFrame::decode), Some(frame));
    }

    #[test]
    fn lenient_validation_accepts_corrupted_complement() {
        let frame = NecFrame::from_bytes(0x12, 0x34, 0x38, 0x00);
        assert_eq!(frame.validate(FrameValidation::Lenient), Ok(frame));
    }

    #[test]
    fn strict_validation_reports_first_mismatch() {
        let bad_address = NecFrame::from_bytes(0x12, 0x34, 0x38, 0xC7);
        assert_eq!(
            bad_address.validate(FrameValidation::Strict),
            Err(FrameError::AddressMismatch {
                address: 0x12,
                complement: 0x34
            })
        );

        let bad_command = NecFrame::from_bytes(0x00, 0xFF, 0x38, 0x00);
        let error = bad_command
            .validate(FrameValidation::Strict)
            .expect_err("command complement mismatch");
        assert_eq!(error.command_hint(), Some(0x38));

        assert!(NecFrame::new(0x00, 0x38).validate(FrameValidation::Strict).is_ok());
    }
}
