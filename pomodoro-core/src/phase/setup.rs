//! Edit handling shared by the focus and rest configuration screens.

use crate::minutes::{EditCursor, MinuteValue};
use crate::remote::Button;

/// Value and cursor after an accepted edit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SetupEdit {
    pub value: MinuteValue,
    pub cursor: EditCursor,
}

/// Applies an edit button to a configuration value.
///
/// Returns `None` for buttons the setup screens ignore (`*`, `#`, `OK`);
/// `OK` is handled by the phase controller because it leaves the screen.
#[must_use]
pub const fn apply_edit(value: MinuteValue, cursor: EditCursor, button: Button) -> Option<SetupEdit> {
    let edit = match button {
        Button::Left => SetupEdit {
            value,
            cursor: EditCursor::Tens,
        },
        Button::Right => SetupEdit {
            value,
            cursor: EditCursor::Units,
        },
        Button::Up => SetupEdit {
            value: value.incremented(),
            cursor,
        },
        Button::Down => SetupEdit {
            value: value.decremented(),
            cursor,
        },
        Button::Star | Button::Hash | Button::Ok => return None,
        digit => match digit.digit() {
            Some(digit) => SetupEdit {
                value: value.with_digit(cursor, digit),
                cursor,
            },
            None => return None,
        },
    };
    Some(edit)
}
