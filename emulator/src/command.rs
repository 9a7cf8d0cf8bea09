//! Console command grammar.
//!
//! ```text
//! press <label>        button label as printed on the remote (0-9 * # ^ V < > OK)
//! frame <hex>          raw 32-bit frame word, first symbol in the top bit
//! ir <ticks>...        capture intervals fed straight to the decoder
//! tick [count]         advance the clock by whole seconds
//! reset [bounce]       press the reset button, optionally releasing it early
//! lcd | status | help [topic]
//! ```

use core::fmt;

use pomodoro_core::remote::Button;
use winnow::ascii::{Caseless, dec_uint, hex_uint, space1};
use winnow::combinator::{alt, eof, opt, peek, preceded, separated, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Press(Button),
    Frame(u32),
    Intervals(Vec<u32>),
    Tick(u32),
    Reset { bounce: bool },
    Lcd,
    Status,
    Help(Option<String>),
}

/// Column at which a line stopped parsing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub offset: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected input at column {}", self.offset + 1)
    }
}

pub fn parse_command(line: &str) -> Result<Command, SyntaxError> {
    command.parse(line.trim()).map_err(|error| SyntaxError {
        offset: error.offset(),
    })
}

fn command(input: &mut &str) -> ModalResult<Command> {
    alt((
        press,
        frame,
        intervals,
        tick,
        reset,
        keyword("lcd").value(Command::Lcd),
        keyword("status").value(Command::Status),
        help,
    ))
    .parse_next(input)
}

fn keyword<'a>(name: &'static str) -> impl Parser<&'a str, &'a str, ErrMode<ContextError>> {
    terminated(literal(Caseless(name)), peek(alt((space1, eof))))
}

fn press(input: &mut &str) -> ModalResult<Command> {
    preceded(
        (keyword("press"), space1),
        take_while(1.., |c: char| !c.is_ascii_whitespace()).verify_map(Button::from_label),
    )
    .map(Command::Press)
    .parse_next(input)
}

fn frame(input: &mut &str) -> ModalResult<Command> {
    preceded(
        (keyword("frame"), space1, opt(alt(("0x", "0X")))),
        hex_uint::<_, u32, _>,
    )
    .map(Command::Frame)
    .parse_next(input)
}

fn intervals(input: &mut &str) -> ModalResult<Command> {
    preceded(
        (keyword("ir"), space1),
        separated(1.., dec_uint::<_, u32, _>, space1),
    )
    .map(Command::Intervals)
    .parse_next(input)
}

fn tick(input: &mut &str) -> ModalResult<Command> {
    preceded(keyword("tick"), opt(preceded(space1, dec_uint::<_, u32, _>)))
        .map(|count| Command::Tick(count.unwrap_or(1)))
        .parse_next(input)
}

fn reset(input: &mut &str) -> ModalResult<Command> {
    preceded(keyword("reset"), opt(preceded(space1, keyword("bounce"))))
        .map(|bounce| Command::Reset {
            bounce: bounce.is_some(),
        })
        .parse_next(input)
}

fn help(input: &mut &str) -> ModalResult<Command> {
    preceded(
        keyword("help"),
        opt(preceded(
            space1,
            take_while(1.., |c: char| c.is_ascii_alphabetic()),
        )),
    )
    .map(|topic: Option<&str>| Command::Help(topic.map(str::to_ascii_lowercase)))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_button_presses_by_label() {
        assert_eq!(parse_command("press OK"), Ok(Command::Press(Button::Ok)));
        assert_eq!(parse_command("PRESS ok"), Ok(Command::Press(Button::Ok)));
        assert_eq!(parse_command("press 7"), Ok(Command::Press(Button::Digit7)));
        assert_eq!(parse_command("press ^"), Ok(Command::Press(Button::Up)));
        assert_eq!(parse_command("  press #  "), Ok(Command::Press(Button::Hash)));
        assert!(parse_command("press banana").is_err());
        assert!(parse_command("press").is_err());
    }

    #[test]
    fn parses_frames_with_or_without_prefix() {
        assert_eq!(parse_command("frame 0x00FF38C7"), Ok(Command::Frame(0x00FF_38C7)));
        assert_eq!(parse_command("frame 00ff38c7"), Ok(Command::Frame(0x00FF_38C7)));
        assert!(parse_command("frame 0x1FFFFFFFF").is_err());
    }

    #[test]
    fn parses_interval_lists() {
        assert_eq!(
            parse_command("ir 13500 1125 2250"),
            Ok(Command::Intervals(vec![13_500, 1_125, 2_250]))
        );
        assert!(parse_command("ir").is_err());
        assert!(parse_command("ir 12 x").is_err());
    }

    #[test]
    fn tick_count_defaults_to_one() {
        assert_eq!(parse_command("tick"), Ok(Command::Tick(1)));
        assert_eq!(parse_command("tick 61"), Ok(Command::Tick(61)));
    }

    #[test]
    fn reset_accepts_bounce_flag() {
        assert_eq!(parse_command("reset"), Ok(Command::Reset { bounce: false }));
        assert_eq!(
            parse_command("reset bounce"),
            Ok(Command::Reset { bounce: true })
        );
        assert!(parse_command("resetx").is_err());
    }

    #[test]
    fn parses_bare_keywords_and_help_topics() {
        assert_eq!(parse_command("lcd"), Ok(Command::Lcd));
        assert_eq!(parse_command("Status"), Ok(Command::Status));
        assert_eq!(parse_command("help"), Ok(Command::Help(None)));
        assert_eq!(
            parse_command("help Press"),
            Ok(Command::Help(Some("press".to_string())))
        );
    }

    #[test]
    fn reports_offset_of_bad_input() {
        let error = parse_command("tick nine").expect_err("not a number");
        assert_eq!(error.offset, 4);
        assert_eq!(error.to_string(), "unexpected input at column 5");
    }
}
