//! Telemetry event catalog and the ring buffer the dispatch loop records into.
//!
//! Events carry compact numeric codes so firmware logs and the emulator
//! transcript can be compared line for line without formatting payloads.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

use crate::countdown::SubPhase;
use crate::phase::PhaseKind;
use crate::remote::Button;

/// Identifier assigned to each recorded event.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Discriminated telemetry events emitted by the controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    ButtonAccepted(Button),
    ButtonIgnored(Button),
    UnknownCommand(u8),
    /// A complete frame failed the complement check; carries its command byte.
    FrameRejected(u8),
    PhaseEntered(PhaseKind),
    SubPhaseStarted(SubPhase),
    BuzzerAsserted,
    ResetConfirmed,
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::ButtonAccepted(button) => write!(f, "button-accepted {button}"),
            TelemetryEventKind::ButtonIgnored(button) => write!(f, "button-ignored {button}"),
            TelemetryEventKind::UnknownCommand(code) => write!(f, "unknown-command {code:#04x}"),
            TelemetryEventKind::FrameRejected(code) => write!(f, "frame-rejected {code:#04x}"),
            TelemetryEventKind::PhaseEntered(phase) => write!(f, "phase-entered {phase}"),
            TelemetryEventKind::SubPhaseStarted(sub_phase) => {
                write!(f, "sub-phase-started {sub_phase}")
            }
            TelemetryEventKind::BuzzerAsserted => f.write_str("buzzer-asserted"),
            TelemetryEventKind::ResetConfirmed => f.write_str("reset-confirmed"),
        }
    }
}

impl TelemetryEventKind {
    const PHASE_ENTERED_BASE: u16 = 0x0010;
    const SUB_PHASE_BASE: u16 = 0x0020;
    const BUZZER_ASSERTED_CODE: u16 = 0x0030;
    const RESET_CONFIRMED_CODE: u16 = 0x0031;
    const BUTTON_ACCEPTED_BASE: u16 = 0x0100;
    const BUTTON_IGNORED_BASE: u16 = 0x0200;
    const UNKNOWN_COMMAND_BASE: u16 = 0x0300;
    const FRAME_REJECTED_BASE: u16 = 0x0400;

    /// Encodes the event into a compact transport-friendly discriminant.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            TelemetryEventKind::ButtonAccepted(button) => {
                Self::BUTTON_ACCEPTED_BASE | u16::from(button.command_byte())
            }
            TelemetryEventKind::ButtonIgnored(button) => {
                Self::BUTTON_IGNORED_BASE | u16::from(button.command_byte())
            }
            TelemetryEventKind::UnknownCommand(code) => Self::UNKNOWN_COMMAND_BASE | u16::from(code),
            TelemetryEventKind::FrameRejected(code) => Self::FRAME_REJECTED_BASE | u16::from(code),
            TelemetryEventKind::PhaseEntered(phase) => {
                Self::PHASE_ENTERED_BASE + phase_index(phase)
            }
            TelemetryEventKind::SubPhaseStarted(sub_phase) => {
                Self::SUB_PHASE_BASE + sub_phase_index(sub_phase)
            }
            TelemetryEventKind::BuzzerAsserted => Self::BUZZER_ASSERTED_CODE,
            TelemetryEventKind::ResetConfirmed => Self::RESET_CONFIRMED_CODE,
        }
    }

    /// Decodes a raw discriminant, returning `None` for codes outside the catalog.
    #[must_use]
    pub fn from_raw(code: u16) -> Option<Self> {
        let [high, low] = code.to_be_bytes();
        match code {
            Self::BUZZER_ASSERTED_CODE => Some(TelemetryEventKind::BuzzerAsserted),
            Self::RESET_CONFIRMED_CODE => Some(TelemetryEventKind::ResetConfirmed),
            value if (Self::PHASE_ENTERED_BASE..Self::PHASE_ENTERED_BASE + 4).contains(&value) => {
                phase_from_index(value - Self::PHASE_ENTERED_BASE)
                    .map(TelemetryEventKind::PhaseEntered)
            }
            value if (Self::SUB_PHASE_BASE..Self::SUB_PHASE_BASE + 2).contains(&value) => {
                sub_phase_from_index(value - Self::SUB_PHASE_BASE)
                    .map(TelemetryEventKind::SubPhaseStarted)
            }
            _ => match high {
                0x01 => Button::from_command(low).map(TelemetryEventKind::ButtonAccepted),
                0x02 => Button::from_command(low).map(TelemetryEventKind::ButtonIgnored),
                0x03 => Some(TelemetryEventKind::UnknownCommand(low)),
                0x04 => Some(TelemetryEventKind::FrameRejected(low)),
                _ => None,
            },
        }
    }
}

const fn phase_index(phase: PhaseKind) -> u16 {
    match phase {
        PhaseKind::Welcome => 0,
        PhaseKind::ConfigureFocus => 1,
        PhaseKind::ConfigureRest => 2,
        PhaseKind::Running => 3,
    }
}

const fn phase_from_index(index: u16) -> Option<PhaseKind> {
    match index {
        0 => Some(PhaseKind::Welcome),
        1 => Some(PhaseKind::ConfigureFocus),
        2 => Some(PhaseKind::ConfigureRest),
        3 => Some(PhaseKind::Running),
        _ => None,
    }
}

const fn sub_phase_index(sub_phase: SubPhase) -> u16 {
    match sub_phase {
        SubPhase::Focus => 0,
        SubPhase::Rest => 1,
    }
}

const fn sub_phase_from_index(index: u16) -> Option<SubPhase> {
    match index {
        0 => Some(SubPhase::Focus),
        1 => Some(SubPhase::Rest),
        _ => None,
    }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord<TInstant>
where
    TInstant: Copy,
{
    pub id: EventId,
    pub timestamp: TInstant,
    pub event: TelemetryEventKind,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord<TInstant>, CAPACITY>;

/// Records telemetry events into a fixed-size ring buffer, overwriting the oldest.
pub struct TelemetryRecorder<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY>
where
    TInstant: Copy,
{
    ring: TelemetryRing<TInstant, CAPACITY>,
    next_event_id: EventId,
}

impl<TInstant, const CAPACITY: usize> TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: Copy,
{
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Records an event and returns its identifier.
    pub fn record(&mut self, event: TelemetryEventKind, timestamp: TInstant) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            timestamp,
            event,
        });

        id
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord<TInstant>> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    pub fn latest(&self) -> Option<&TelemetryRecord<TInstant>> {
        self.ring.recent()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Total events recorded since start-up, including overwritten ones.
    pub fn total_recorded(&self) -> EventId {
        self.next_event_id
    }
}

impl<TInstant, const CAPACITY: usize> Default for TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_decode_back() {
        let events = [
            TelemetryEventKind::ButtonAccepted(Button::Ok),
            TelemetryEventKind::ButtonIgnored(Button::Digit7),
            TelemetryEventKind::UnknownCommand(0x45),
            TelemetryEventKind::FrameRejected(0x38),
            TelemetryEventKind::PhaseEntered(PhaseKind::ConfigureRest),
            TelemetryEventKind::SubPhaseStarted(SubPhase::Rest),
            TelemetryEventKind::BuzzerAsserted,
            TelemetryEventKind::ResetConfirmed,
        ];

        for event in events {
            assert_eq!(TelemetryEventKind::from_raw(event.to_raw()), Some(event));
        }
        assert_eq!(TelemetryEventKind::ButtonAccepted(Button::Ok).to_raw(), 0x0138);
    }

    #[test]
    fn unknown_raw_codes_are_rejected() {
        assert_eq!(TelemetryEventKind::from_raw(0x0014), None);
        assert_eq!(TelemetryEventKind::from_raw(0x0145), None);
        assert_eq!(TelemetryEventKind::from_raw(0x0900), None);
    }

    #[test]
    fn ring_keeps_most_recent_entries() {
        let mut recorder: TelemetryRecorder<u32, 4> = TelemetryRecorder::new();
        for timestamp in 0..6 {
            recorder.record(TelemetryEventKind::BuzzerAsserted, timestamp);
        }

        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.total_recorded(), 6);
        assert_eq!(recorder.latest().map(|record| record.id), Some(5));
        let first = recorder.oldest_first().next().map(|record| record.timestamp);
        assert_eq!(first, Some(2));
    }
}
