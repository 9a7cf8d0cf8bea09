//! Edge timing for the IR receiver.
//!
//! The receiver output idles high and pulls low at the start of every mark,
//! so the interval between successive falling edges is one symbol.

use pomodoro_core::ir::{CaptureOutcome, FrameAssembler, PulseThresholds, RawFrame};

use crate::instant::FirmwareInstant;
use crate::status;

pub struct EdgeCapture {
    assembler: FrameAssembler,
    last_edge: Option<FirmwareInstant>,
}

impl EdgeCapture {
    pub const fn new(thresholds: PulseThresholds) -> Self {
        Self {
            assembler: FrameAssembler::new(thresholds),
            last_edge: None,
        }
    }

    /// Feeds one falling edge. Returns the frame when the edge completes one.
    pub fn on_edge(&mut self, now: FirmwareInstant) -> Option<RawFrame> {
        let previous = self.last_edge.replace(now)?;

        match self.assembler.push_interval(now.micros_since(previous)) {
            CaptureOutcome::FrameReady => self.assembler.take_frame(),
            CaptureOutcome::Ignored => {
                status::record_edge_ignored();
                None
            }
            CaptureOutcome::Accepted { .. } | CaptureOutcome::Discarded { .. } => None,
        }
    }

    /// Resumes capture. The next edge only starts a new interval.
    pub fn rearm(&mut self) {
        self.assembler.rearm();
        self.last_edge = None;
    }

    pub fn is_armed(&self) -> bool {
        self.assembler.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_time::Instant;
    use pomodoro_core::ir::{NecFrame, PulseTiming};

    fn edges_for(frame: NecFrame, start: u64) -> Vec<FirmwareInstant> {
        let mut at = start;
        let mut edges = vec![FirmwareInstant::from(Instant::from_micros(at))];
        for interval in frame.to_intervals(&PulseTiming::DEFAULT) {
            at += u64::from(interval);
            edges.push(FirmwareInstant::from(Instant::from_micros(at)));
        }
        edges
    }

    #[test]
    fn edges_assemble_into_frame_and_disarm() {
        let mut capture = EdgeCapture::new(PulseThresholds::DEFAULT);
        let frame = NecFrame::new(0x00, 0x38);

        let mut ready = None;
        for edge in edges_for(frame, 1_000) {
            if let Some(raw) = capture.on_edge(edge) {
                ready = Some(raw);
            }
        }

        assert_eq!(ready.map(RawFrame::decode), Some(frame));
        assert!(!capture.is_armed());

        for edge in edges_for(NecFrame::new(0x00, 0x18), 200_000) {
            assert_eq!(capture.on_edge(edge), None);
        }
    }

    #[test]
    fn rearm_forgets_previous_edge() {
        let mut capture = EdgeCapture::new(PulseThresholds::DEFAULT);
        for edge in edges_for(NecFrame::new(0x00, 0x38), 0) {
            capture.on_edge(edge);
        }
        capture.rearm();
        assert!(capture.is_armed());

        let frame = NecFrame::new(0x00, 0xA2);
        let ready = edges_for(frame, 500_000)
            .into_iter()
            .find_map(|edge| capture.on_edge(edge));
        assert_eq!(ready.map(RawFrame::decode), Some(frame));
    }
}
