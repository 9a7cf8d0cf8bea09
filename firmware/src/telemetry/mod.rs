//! Telemetry ring plumbing and logging helpers.
//!
//! The dispatch loop records into the shared `pomodoro-core` ring. After each
//! dispatch, [`TelemetryLogger`] mirrors the records it has not printed yet to
//! defmt on target, or stdout on host builds, so bring-up logs and the ring
//! stay in step.

use pomodoro_core::phase::Event;
use pomodoro_core::telemetry::{EventId, TelemetryEventKind, TelemetryRecorder};

use crate::instant::FirmwareInstant;
use crate::status::StatusSnapshot;

/// Telemetry ring keyed on the Embassy clock.
pub type FirmwareTelemetry = TelemetryRecorder<FirmwareInstant>;

/// Tracks which ring entries have already been logged.
#[derive(Debug, Default)]
pub struct TelemetryLogger {
    next_id: EventId,
}

impl TelemetryLogger {
    pub const fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Logs every record newer than the last flush and returns how many were logged.
    pub fn flush<const CAPACITY: usize>(
        &mut self,
        telemetry: &TelemetryRecorder<FirmwareInstant, CAPACITY>,
    ) -> usize {
        let mut logged = 0;
        for record in telemetry.oldest_first() {
            if record.id.wrapping_sub(self.next_id) > EventId::MAX / 2 {
                continue;
            }
            emit_record(record.id, record.timestamp.as_micros(), record.event);
            self.next_id = record.id.wrapping_add(1);
            logged += 1;
        }
        logged
    }
}

const fn event_label(event: Event) -> &'static str {
    match event {
        Event::FrameReady(_) => "frame-ready",
        Event::Button(_) => "button",
        Event::TickElapsed => "tick",
        Event::ResetConfirmed => "reset",
    }
}

pub fn log_event_dropped(event: Event) {
    emit_event_dropped(event_label(event));
}

pub fn log_event_delayed(event: Event) {
    emit_event_delayed(event_label(event));
}

#[cfg(target_os = "none")]
fn emit_event_delayed(label: &'static str) {
    defmt::warn!("event queue full; waiting to post {}", label);
}

#[cfg(not(target_os = "none"))]
fn emit_event_delayed(label: &'static str) {
    println!("event queue full; waiting to post {label}");
}

#[cfg(target_os = "none")]
fn emit_record(id: EventId, timestamp_us: u64, event: TelemetryEventKind) {
    defmt::info!(
        "telemetry:{} code={=u16:#x} {} t={}us",
        id,
        event.to_raw(),
        defmt::Display2Format(&event),
        timestamp_us
    );
}

#[cfg(not(target_os = "none"))]
fn emit_record(id: EventId, timestamp_us: u64, event: TelemetryEventKind) {
    println!(
        "telemetry:{id} code={:#06x} {event} t={timestamp_us}us",
        event.to_raw()
    );
}

#[cfg(target_os = "none")]
fn emit_event_dropped(label: &'static str) {
    defmt::warn!("event queue full; dropped {}", label);
}

#[cfg(not(target_os = "none"))]
fn emit_event_dropped(label: &'static str) {
    println!("event queue full; dropped {label}");
}

#[cfg(target_os = "none")]
pub fn log_status(status: &StatusSnapshot) {
    defmt::info!(
        "status phase={} frames={} dropped={} ignored-edges={} reset-bounces={}",
        defmt::Display2Format(&status.phase),
        status.frames_posted,
        status.events_dropped,
        status.edges_ignored,
        status.reset_bounces
    );
}

#[cfg(not(target_os = "none"))]
pub fn log_status(status: &StatusSnapshot) {
    println!(
        "status phase={} frames={} dropped={} ignored-edges={} reset-bounces={}",
        status.phase,
        status.frames_posted,
        status.events_dropped,
        status.edges_ignored,
        status.reset_bounces
    );
}

#[cfg(target_os = "none")]
pub fn log_display_error(operation: &'static str) {
    defmt::warn!("lcd {} failed; continuing", operation);
}

#[cfg(not(target_os = "none"))]
pub fn log_display_error(operation: &'static str) {
    println!("lcd {operation} failed; continuing");
}

#[cfg(target_os = "none")]
pub fn log_buzzer_dropped() {
    defmt::warn!("buzzer queue full; command dropped");
}

#[cfg(not(target_os = "none"))]
pub fn log_buzzer_dropped() {
    println!("buzzer queue full; command dropped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Instant;
    use pomodoro_core::phase::PhaseKind;

    fn at(micros: u64) -> FirmwareInstant {
        FirmwareInstant::from(Instant::from_micros(micros))
    }

    #[test]
    fn flush_logs_each_record_once() {
        let mut telemetry: TelemetryRecorder<FirmwareInstant, 4> = TelemetryRecorder::new();
        let mut logger = TelemetryLogger::new();

        telemetry.record(TelemetryEventKind::ResetConfirmed, at(10));
        telemetry.record(TelemetryEventKind::PhaseEntered(PhaseKind::Welcome), at(11));
        assert_eq!(logger.flush(&telemetry), 2);
        assert_eq!(logger.flush(&telemetry), 0);

        telemetry.record(TelemetryEventKind::BuzzerAsserted, at(12));
        assert_eq!(logger.flush(&telemetry), 1);
    }

    #[test]
    fn flush_skips_entries_already_overwritten() {
        let mut telemetry: TelemetryRecorder<FirmwareInstant, 4> = TelemetryRecorder::new();
        let mut logger = TelemetryLogger::new();

        for tick in 0..6 {
            telemetry.record(TelemetryEventKind::BuzzerAsserted, at(tick));
        }
        assert_eq!(logger.flush(&telemetry), 4);
        assert_eq!(logger.flush(&telemetry), 0);
    }
}
