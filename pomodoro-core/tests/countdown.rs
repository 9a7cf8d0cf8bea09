use pomodoro_core::app::PomodoroApp;
use pomodoro_core::config::TimerConfig;
use pomodoro_core::countdown::SubPhase;
use pomodoro_core::display::{Buzzer, NoopDisplay, Screen};
use pomodoro_core::minutes::MinuteValue;
use pomodoro_core::phase::{Controller, Effect, Event, Phase};
use pomodoro_core::remote::Button;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuzzerOp {
    Assert,
    Release,
    Chime,
}

#[derive(Default)]
struct BuzzerLog {
    ops: Vec<BuzzerOp>,
}

impl Buzzer for BuzzerLog {
    fn assert(&mut self) {
        self.ops.push(BuzzerOp::Assert);
    }

    fn release(&mut self) {
        self.ops.push(BuzzerOp::Release);
    }

    fn chime(&mut self) {
        self.ops.push(BuzzerOp::Chime);
    }
}

fn running_controller(focus: u8, rest: u8) -> Controller {
    let mut config = TimerConfig::new();
    config.default_focus = MinuteValue::from_minutes(focus).expect("valid focus");
    config.default_rest = MinuteValue::from_minutes(rest).expect("valid rest");

    let mut controller = Controller::new(config);
    for _ in 0..3 {
        controller.handle(Event::Button(Button::Ok));
    }
    controller
}

#[test]
fn focus_minute_flips_to_rest_after_sixty_one_ticks() {
    let mut controller = running_controller(1, 2);

    for tick in 1..=60 {
        controller.handle(Event::TickElapsed);
        assert_eq!(
            controller.phase(),
            Phase::Running {
                sub_phase: SubPhase::Focus
            },
            "tick {tick}"
        );
    }
    assert_eq!(controller.countdown().remaining_seconds(), 0);

    controller.handle(Event::TickElapsed);
    assert_eq!(
        controller.phase(),
        Phase::Running {
            sub_phase: SubPhase::Rest
        }
    );
    assert_eq!(controller.countdown().minutes(), 2);
    assert_eq!(controller.countdown().seconds(), 0);
    assert!(controller.countdown().is_active());
    assert!(!controller.countdown().buzzer_armed());
}

#[test]
fn rest_flips_back_to_focus() {
    let mut controller = running_controller(1, 1);
    for _ in 0..(61 * 2) {
        controller.handle(Event::TickElapsed);
    }
    assert_eq!(
        controller.phase(),
        Phase::Running {
            sub_phase: SubPhase::Focus
        }
    );
}

#[test]
fn buzzer_asserted_on_fifty_seven_and_held_until_restart() {
    let mut app: PomodoroApp<_, _, u64> =
        PomodoroApp::new(TimerConfig::new(), NoopDisplay, BuzzerLog::default());
    for _ in 0..3 {
        app.dispatch(Event::Button(Button::Ok), 0);
    }

    for second in 1..=61 {
        let seconds_before = app.controller().countdown().seconds();
        let logged = app.buzzer().ops.len();
        app.dispatch(Event::TickElapsed, second);
        let asserted = app.buzzer().ops[logged..].contains(&BuzzerOp::Assert);
        assert_eq!(asserted, seconds_before == 57, "tick {second}");
        assert_eq!(asserted, second == 4, "tick {second}");
    }

    assert_eq!(
        app.buzzer().ops,
        [
            BuzzerOp::Release,
            BuzzerOp::Assert,
            BuzzerOp::Release,
            BuzzerOp::Chime,
            BuzzerOp::Release
        ]
    );
}

#[test]
fn every_tick_renders_the_clock() {
    let mut controller = running_controller(1, 1);

    let effects = controller.handle(Event::TickElapsed);
    assert_eq!(
        effects.as_slice(),
        [Effect::Render(Screen::Countdown {
            sub_phase: SubPhase::Focus,
            minutes: 0,
            seconds: 59
        })]
    );
}

#[test]
fn two_minute_focus_decrements_across_minute_boundary() {
    let mut controller = running_controller(2, 1);
    controller.handle(Event::TickElapsed);
    assert_eq!(
        (controller.countdown().minutes(), controller.countdown().seconds()),
        (1, 59)
    );

    for _ in 0..59 {
        controller.handle(Event::TickElapsed);
    }
    assert_eq!(
        (controller.countdown().minutes(), controller.countdown().seconds()),
        (1, 0)
    );

    controller.handle(Event::TickElapsed);
    assert_eq!(
        (controller.countdown().minutes(), controller.countdown().seconds()),
        (0, 59)
    );
}
