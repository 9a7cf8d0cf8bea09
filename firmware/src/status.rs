//! Shared counters for the firmware target.
//!
//! Tasks bump these atomics instead of sharing mutable state; the dispatch
//! loop reads a [`StatusSnapshot`] when it logs diagnostics.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};
use pomodoro_core::phase::PhaseKind;

/// Events discarded because the dispatch queue was full.
static EVENTS_DROPPED: AtomicU32 = AtomicU32::new(0);
/// Frames handed to the dispatch loop.
static FRAMES_POSTED: AtomicU32 = AtomicU32::new(0);
/// Edges that arrived while the capture task was disarmed.
static EDGES_IGNORED: AtomicU32 = AtomicU32::new(0);
/// Reset edges rejected by the debounce resample.
static RESET_BOUNCES: AtomicU32 = AtomicU32::new(0);
/// Phase after the most recent dispatch.
static PHASE: AtomicU8 = AtomicU8::new(0);

/// Point-in-time copy of the counters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StatusSnapshot {
    pub events_dropped: u32,
    pub frames_posted: u32,
    pub edges_ignored: u32,
    pub reset_bounces: u32,
    pub phase: PhaseKind,
}

pub fn record_event_dropped() {
    EVENTS_DROPPED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_frame_posted() {
    FRAMES_POSTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_edge_ignored() {
    EDGES_IGNORED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_reset_bounce() {
    RESET_BOUNCES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_phase(phase: PhaseKind) {
    PHASE.store(phase_code(phase), Ordering::Relaxed);
}

pub fn snapshot() -> StatusSnapshot {
    StatusSnapshot {
        events_dropped: EVENTS_DROPPED.load(Ordering::Relaxed),
        frames_posted: FRAMES_POSTED.load(Ordering::Relaxed),
        edges_ignored: EDGES_IGNORED.load(Ordering::Relaxed),
        reset_bounces: RESET_BOUNCES.load(Ordering::Relaxed),
        phase: phase_from_code(PHASE.load(Ordering::Relaxed)),
    }
}

const fn phase_code(phase: PhaseKind) -> u8 {
    match phase {
        PhaseKind::Welcome => 0,
        PhaseKind::ConfigureFocus => 1,
        PhaseKind::ConfigureRest => 2,
        PhaseKind::Running => 3,
    }
}

const fn phase_from_code(code: u8) -> PhaseKind {
    match code {
        1 => PhaseKind::ConfigureFocus,
        2 => PhaseKind::ConfigureRest,
        3 => PhaseKind::Running,
        _ => PhaseKind::Welcome,
    }
}
