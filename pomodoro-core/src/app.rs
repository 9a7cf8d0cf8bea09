//! Dispatch loop body shared by the firmware and the emulator.
//!
//! [`PomodoroApp`] owns the controller and its collaborators, feeds one event
//! at a time through [`Controller::handle`], and carries out the effects in
//! order. The caller owns the event queue and the capture source; it learns
//! whether to re-arm capture from the returned [`DispatchSummary`].

use crate::config::TimerConfig;
use crate::display::{Buzzer, TextDisplay};
use crate::phase::{BuzzerCommand, Controller, Effect, Event};
use crate::telemetry::TelemetryRecorder;

/// What a single dispatch did beyond updating the collaborators.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DispatchSummary {
    /// The capture source may resume collecting frames.
    pub rearm_decoder: bool,
    pub renders: u8,
    pub records: u8,
}

/// Controller plus the display, buzzer, and telemetry ring it drives.
pub struct PomodoroApp<D, B, TInstant>
where
    D: TextDisplay,
    B: Buzzer,
    TInstant: Copy,
{
    controller: Controller,
    display: D,
    buzzer: B,
    telemetry: TelemetryRecorder<TInstant>,
}

impl<D, B, TInstant> PomodoroApp<D, B, TInstant>
where
    D: TextDisplay,
    B: Buzzer,
    TInstant: Copy,
{
    pub const fn new(config: TimerConfig, display: D, buzzer: B) -> Self {
        Self {
            controller: Controller::new(config),
            display,
            buzzer,
            telemetry: TelemetryRecorder::new(),
        }
    }

    /// Draws the initial screen with the buzzer released.
    pub fn start(&mut self) {
        self.buzzer.release();
        self.controller.screen().draw(&mut self.display);
    }

    /// Handles one event and applies its effects in order.
    pub fn dispatch(&mut self, event: Event, now: TInstant) -> DispatchSummary {
        let effects = self.controller.handle(event);
        let mut summary = DispatchSummary::default();

        for effect in effects {
            match effect {
                Effect::Render(screen) => {
                    screen.draw(&mut self.display);
                    summary.renders = summary.renders.saturating_add(1);
                }
                Effect::Buzzer(BuzzerCommand::Assert) => self.buzzer.assert(),
                Effect::Buzzer(BuzzerCommand::Release) => self.buzzer.release(),
                Effect::Buzzer(BuzzerCommand::Chime) => self.buzzer.chime(),
                Effect::RearmDecoder => summary.rearm_decoder = true,
                Effect::Record(kind) => {
                    self.telemetry.record(kind, now);
                    summary.records = summary.records.saturating_add(1);
                }
            }
        }

        summary
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }

    pub fn buzzer_mut(&mut self) -> &mut B {
        &mut self.buzzer
    }

    pub fn telemetry(&self) -> &TelemetryRecorder<TInstant> {
        &self.telemetry
    }
}
