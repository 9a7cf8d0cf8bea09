//! Phase controller: the single owner of timer state.
//!
//! Interrupt handlers and tasks never touch this state directly. They post
//! [`Event`]s into a bounded queue; the dispatch loop feeds them here one at a
//! time and carries out the returned [`Effect`]s on the display, buzzer, and
//! capture source. Keeping the transition free of I/O lets the firmware, the
//! emulator, and the tests drive the exact same logic.

pub mod setup;

use core::fmt;

use heapless::Vec;

use crate::config::TimerConfig;
use crate::countdown::{Countdown, SubPhase, TickOutcome};
use crate::display::Screen;
use crate::ir::RawFrame;
use crate::minutes::{EditCursor, MinuteValue};
use crate::remote::Button;
use crate::telemetry::TelemetryEventKind;

pub use setup::{SetupEdit, apply_edit};

/// Upper bound on effects produced by a single event.
pub const MAX_EFFECTS: usize = 8;

/// Effects emitted by one transition, in execution order.
pub type Effects = Vec<Effect, MAX_EFFECTS>;

/// Phase discriminant without payload, used for telemetry and status output.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PhaseKind {
    Welcome,
    ConfigureFocus,
    ConfigureRest,
    Running,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Welcome => f.write_str("welcome"),
            PhaseKind::ConfigureFocus => f.write_str("configure-focus"),
            PhaseKind::ConfigureRest => f.write_str("configure-rest"),
            PhaseKind::Running => f.write_str("running"),
        }
    }
}

/// Top-level user-visible mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Welcome,
    ConfigureFocus { cursor: EditCursor },
    ConfigureRest { cursor: EditCursor },
    Running { sub_phase: SubPhase },
}

impl Phase {
    #[must_use]
    pub const fn kind(self) -> PhaseKind {
        match self {
            Phase::Welcome => PhaseKind::Welcome,
            Phase::ConfigureFocus { .. } => PhaseKind::ConfigureFocus,
            Phase::ConfigureRest { .. } => PhaseKind::ConfigureRest,
            Phase::Running { .. } => PhaseKind::Running,
        }
    }
}

/// Inputs posted by the capture, tick, and reset handlers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// The capture source completed a 32-symbol frame and is disarmed.
    FrameReady(RawFrame),
    /// A button resolved outside the IR path (host console, tests).
    Button(Button),
    TickElapsed,
    ResetConfirmed,
}

/// Buzzer operations requested by the controller.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuzzerCommand {
    Assert,
    Release,
    Chime,
}

/// Side effects the dispatch loop must carry out.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    Render(Screen),
    Buzzer(BuzzerCommand),
    /// Resume IR capture. Always the last effect of a frame or reset event.
    RearmDecoder,
    Record(TelemetryEventKind),
}

/// Phase, configured values, and countdown.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Controller {
    config: TimerConfig,
    phase: Phase,
    focus: MinuteValue,
    rest: MinuteValue,
    countdown: Countdown,
}

impl Controller {
    /// Creates a controller in the Welcome phase with the configured defaults.
    #[must_use]
    pub const fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Welcome,
            focus: config.default_focus,
            rest: config.default_rest,
            countdown: Countdown::idle(),
        }
    }

    /// Pure transition: returns the next controller and the effects to apply.
    #[must_use]
    pub fn transition(self, event: Event) -> (Self, Effects) {
        let mut next = self;
        let effects = next.handle(event);
        (next, effects)
    }

    /// Applies `event` in place, then restarts an expired countdown.
    pub fn handle(&mut self, event: Event) -> Effects {
        let mut effects = Effects::new();

        match event {
            Event::FrameReady(raw) => self.on_frame(raw, &mut effects),
            Event::Button(button) => self.on_button(button, &mut effects),
            Event::TickElapsed => self.on_tick(&mut effects),
            Event::ResetConfirmed => self.on_reset(&mut effects),
        }

        self.poll_expiry(&mut effects);

        if matches!(event, Event::FrameReady(_) | Event::ResetConfirmed) {
            push(&mut effects, Effect::RearmDecoder);
        }

        effects
    }

    /// Flips Focus and Rest once the running countdown has expired.
    ///
    /// The held buzzer is released before the boundary chime so the chime is
    /// audible as a distinct pulse.
    fn poll_expiry(&mut self, effects: &mut Effects) {
        let Phase::Running { sub_phase } = self.phase else {
            return;
        };
        if !self.countdown.is_expired() {
            return;
        }

        let next = sub_phase.next();
        if self.countdown.buzzer_armed() {
            push(effects, Effect::Buzzer(BuzzerCommand::Release));
        }
        push(effects, Effect::Buzzer(BuzzerCommand::Chime));
        self.start_sub_phase(next, effects);
    }

    fn on_frame(&mut self, raw: RawFrame, effects: &mut Effects) {
        let frame = raw.decode();
        let frame = match frame.validate(self.config.frame_validation) {
            Ok(frame) => frame,
            Err(_) => {
                push(
                    effects,
                    Effect::Record(TelemetryEventKind::FrameRejected(frame.command)),
                );
                return;
            }
        };

        match Button::from_command(frame.command) {
            Some(button) => self.on_button(button, effects),
            None => push(
                effects,
                Effect::Record(TelemetryEventKind::UnknownCommand(frame.command)),
            ),
        }
    }

    fn on_button(&mut self, button: Button, effects: &mut Effects) {
        match self.phase {
            Phase::Welcome if button == Button::Ok => {
                accepted(effects, button);
                self.enter(Phase::ConfigureFocus { cursor: EditCursor::Tens }, effects);
            }
            Phase::ConfigureFocus { .. } if button == Button::Ok => {
                accepted(effects, button);
                self.enter(Phase::ConfigureRest { cursor: EditCursor::Tens }, effects);
            }
            Phase::ConfigureRest { .. } if button == Button::Ok => {
                accepted(effects, button);
                push(
                    effects,
                    Effect::Record(TelemetryEventKind::PhaseEntered(PhaseKind::Running)),
                );
                self.start_sub_phase(SubPhase::Focus, effects);
            }
            Phase::ConfigureFocus { cursor } => match apply_edit(self.focus, cursor, button) {
                Some(edit) => {
                    accepted(effects, button);
                    self.focus = edit.value;
                    self.phase = Phase::ConfigureFocus { cursor: edit.cursor };
                    self.render(effects);
                }
                None => ignored(effects, button),
            },
            Phase::ConfigureRest { cursor } => match apply_edit(self.rest, cursor, button) {
                Some(edit) => {
                    accepted(effects, button);
                    self.rest = edit.value;
                    self.phase = Phase::ConfigureRest { cursor: edit.cursor };
                    self.render(effects);
                }
                None => ignored(effects, button),
            },
            Phase::Welcome | Phase::Running { .. } => ignored(effects, button),
        }
    }

    fn on_tick(&mut self, effects: &mut Effects) {
        if !matches!(self.phase, Phase::Running { .. }) {
            return;
        }

        match self.countdown.tick(self.config.beep_second()) {
            TickOutcome::Idle => {}
            TickOutcome::Counting { buzzer_asserted } => {
                if buzzer_asserted {
                    push(effects, Effect::Buzzer(BuzzerCommand::Assert));
                    push(effects, Effect::Record(TelemetryEventKind::BuzzerAsserted));
                }
                self.render(effects);
            }
            TickOutcome::Expired => self.render(effects),
        }
    }

    fn on_reset(&mut self, effects: &mut Effects) {
        push(effects, Effect::Record(TelemetryEventKind::ResetConfirmed));
        *self = Self::new(self.config);
        push(
            effects,
            Effect::Record(TelemetryEventKind::PhaseEntered(PhaseKind::Welcome)),
        );
        push(effects, Effect::Buzzer(BuzzerCommand::Release));
        self.render(effects);
    }

    fn enter(&mut self, phase: Phase, effects: &mut Effects) {
        self.phase = phase;
        push(
            effects,
            Effect::Record(TelemetryEventKind::PhaseEntered(phase.kind())),
        );
        self.render(effects);
    }

    /// Loads the countdown for `sub_phase`; the buzzer is released on every load.
    fn start_sub_phase(&mut self, sub_phase: SubPhase, effects: &mut Effects) {
        let minutes = match sub_phase {
            SubPhase::Focus => self.focus,
            SubPhase::Rest => self.rest,
        };
        self.phase = Phase::Running { sub_phase };
        self.countdown.load(minutes);
        push(
            effects,
            Effect::Record(TelemetryEventKind::SubPhaseStarted(sub_phase)),
        );
        push(effects, Effect::Buzzer(BuzzerCommand::Release));
        self.render(effects);
    }

    fn render(&self, effects: &mut Effects) {
        push(effects, Effect::Render(self.screen()));
    }

    /// Screen matching the current state.
    #[must_use]
    pub fn screen(&self) -> Screen {
        match self.phase {
            Phase::Welcome => Screen::Welcome,
            Phase::ConfigureFocus { cursor } => Screen::FocusSetup {
                value: self.focus,
                cursor,
            },
            Phase::ConfigureRest { cursor } => Screen::RestSetup {
                value: self.rest,
                cursor,
            },
            Phase::Running { sub_phase } => Screen::Countdown {
                sub_phase,
                minutes: self.countdown.minutes(),
                seconds: self.countdown.seconds(),
            },
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TimerConfig {
        &self.config
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn focus(&self) -> MinuteValue {
        self.focus
    }

    #[must_use]
    pub const fn rest(&self) -> MinuteValue {
        self.rest
    }

    #[must_use]
    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Cursor of the active configuration screen.
    ///
    /// Welcome and Running carry no cursor and report `None`. Leaving Welcome
    /// always enters ConfigureFocus at [`EditCursor::Tens`], so a reset
    /// effectively restores the Tens cursor.
    #[must_use]
    pub const fn cursor(&self) -> Option<EditCursor> {
        match self.phase {
            Phase::ConfigureFocus { cursor } | Phase::ConfigureRest { cursor } => Some(cursor),
            Phase::Welcome | Phase::Running { .. } => None,
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(TimerConfig::new())
    }
}

fn push(effects: &mut Effects, effect: Effect) {
    let pushed = effects.push(effect).is_ok();
    debug_assert!(pushed, "effect buffer overflow");
}

fn accepted(effects: &mut Effects, button: Button) {
    push(
        effects,
        Effect::Record(TelemetryEventKind::ButtonAccepted(button)),
    );
}

fn ignored(effects: &mut Effects, button: Button) {
    push(
        effects,
        Effect::Record(TelemetryEventKind::ButtonIgnored(button)),
    );
}
