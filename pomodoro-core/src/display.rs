//! Display and buzzer collaborators plus the fixed screens drawn on them.
//!
//! The display is a 16x2 character sink. The core never reads it back and
//! treats every call as infallible; transports that can fail log and swallow
//! their errors behind the trait.

use crate::countdown::SubPhase;
use crate::minutes::{EditCursor, MinuteValue};

pub const LCD_COLUMNS: u8 = 16;
pub const LCD_ROWS: u8 = 2;

/// Character display driven by the controller.
pub trait TextDisplay {
    fn clear(&mut self);

    /// Moves the write position to `row`, `column` (both zero-based).
    fn move_cursor(&mut self, row: u8, column: u8);

    /// Writes ASCII text at the current position.
    fn write_text(&mut self, text: &str);

    /// Shows or hides the blinking cursor at the current position.
    fn set_cursor_blink(&mut self, enabled: bool);
}

/// Alert output.
pub trait Buzzer {
    /// Drives the buzzer on and leaves it on.
    fn assert(&mut self);

    /// Turns the buzzer off.
    fn release(&mut self);

    /// Emits a single short pulse.
    fn chime(&mut self);
}

/// Display that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDisplay;

impl NoopDisplay {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TextDisplay for NoopDisplay {
    fn clear(&mut self) {}

    fn move_cursor(&mut self, _: u8, _: u8) {}

    fn write_text(&mut self, _: &str) {}

    fn set_cursor_blink(&mut self, _: bool) {}
}

/// Buzzer that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopBuzzer;

impl NoopBuzzer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Buzzer for NoopBuzzer {
    fn assert(&mut self) {}

    fn release(&mut self) {}

    fn chime(&mut self) {}
}

const FOCUS_LABEL: &str = "Focus: ";
const REST_LABEL: &str = "Rest: ";
const MINUTES_SUFFIX: &str = "min";

/// Everything the controller ever shows, one variant per layout.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Screen {
    Welcome,
    FocusSetup {
        value: MinuteValue,
        cursor: EditCursor,
    },
    RestSetup {
        value: MinuteValue,
        cursor: EditCursor,
    },
    Countdown {
        sub_phase: SubPhase,
        minutes: u8,
        seconds: u8,
    },
}

impl Screen {
    /// Redraws the full screen.
    pub fn draw<D: TextDisplay>(&self, display: &mut D) {
        match *self {
            Screen::Welcome => {
                display.set_cursor_blink(false);
                display.clear();
                display.move_cursor(0, 0);
                display.write_text("OK to choose the");
                display.move_cursor(1, 0);
                display.write_text("focus time");
            }
            Screen::FocusSetup { value, cursor } => {
                draw_setup(display, FOCUS_LABEL, value, cursor);
            }
            Screen::RestSetup { value, cursor } => {
                draw_setup(display, REST_LABEL, value, cursor);
            }
            Screen::Countdown {
                sub_phase,
                minutes,
                seconds,
            } => {
                display.set_cursor_blink(false);
                display.clear();
                display.move_cursor(0, 0);
                display.write_text(sub_phase.banner());
                display.move_cursor(1, 0);
                let clock = clock_ascii(minutes, seconds);
                display.write_text(core::str::from_utf8(&clock).unwrap_or("--:--"));
            }
        }
    }

    /// Column of the blinking edit cursor on row 0, if the screen shows one.
    #[must_use]
    pub fn cursor_column(&self) -> Option<u8> {
        match *self {
            Screen::FocusSetup { cursor, .. } => Some(digit_column(FOCUS_LABEL, cursor)),
            Screen::RestSetup { cursor, .. } => Some(digit_column(REST_LABEL, cursor)),
            Screen::Welcome | Screen::Countdown { .. } => None,
        }
    }
}

fn draw_setup<D: TextDisplay>(
    display: &mut D,
    label: &str,
    value: MinuteValue,
    cursor: EditCursor,
) {
    let digits = value.to_ascii();
    display.clear();
    display.move_cursor(0, 0);
    display.write_text(label);
    display.write_text(core::str::from_utf8(&digits).unwrap_or("??"));
    display.write_text(MINUTES_SUFFIX);
    display.move_cursor(1, 0);
    display.write_text("OK to continue");
    display.move_cursor(0, digit_column(label, cursor));
    display.set_cursor_blink(true);
}

#[allow(clippy::cast_possible_truncation)]
fn digit_column(label: &str, cursor: EditCursor) -> u8 {
    let tens = label.len() as u8;
    match cursor {
        EditCursor::Tens => tens,
        EditCursor::Units => tens + 1,
    }
}

fn clock_ascii(minutes: u8, seconds: u8) -> [u8; 5] {
    let minutes = minutes.min(99);
    let seconds = seconds.min(59);
    [
        b'0' + minutes / 10,
        b'0' + minutes % 10,
        b':',
        b'0' + seconds / 10,
        b'0' + seconds % 10,
    ]
}
