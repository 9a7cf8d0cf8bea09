//! Command table for the bundled 17-key remote.

use core::fmt;

/// Logical buttons recognized on the remote.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Button {
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Star,
    Hash,
    Up,
    Down,
    Left,
    Right,
    Ok,
}

/// Every button in table order.
pub const ALL_BUTTONS: [Button; 17] = [
    Button::Ok,
    Button::Up,
    Button::Down,
    Button::Left,
    Button::Right,
    Button::Digit0,
    Button::Digit1,
    Button::Digit2,
    Button::Digit3,
    Button::Digit4,
    Button::Digit5,
    Button::Digit6,
    Button::Digit7,
    Button::Digit8,
    Button::Digit9,
    Button::Star,
    Button::Hash,
];

impl Button {
    /// Looks up the button for a decoded command byte.
    ///
    /// Unknown bytes are not an error; callers ignore them.
    #[must_use]
    pub const fn from_command(command: u8) -> Option<Self> {
        match command {
            0x38 => Some(Button::Ok),
            0x18 => Some(Button::Up),
            0x4A => Some(Button::Down),
            0x10 => Some(Button::Left),
            0x5A => Some(Button::Right),
            0x98 => Some(Button::Digit0),
            0xA2 => Some(Button::Digit1),
            0x62 => Some(Button::Digit2),
            0xE2 => Some(Button::Digit3),
            0x22 => Some(Button::Digit4),
            0x02 => Some(Button::Digit5),
            0xC2 => Some(Button::Digit6),
            0xE0 => Some(Button::Digit7),
            0xA8 => Some(Button::Digit8),
            0x90 => Some(Button::Digit9),
            0x68 => Some(Button::Star),
            0xB0 => Some(Button::Hash),
            _ => None,
        }
    }

    /// Command byte transmitted for this button.
    #[must_use]
    pub const fn command_byte(self) -> u8 {
        match self {
            Button::Ok => 0x38,
            Button::Up => 0x18,
            Button::Down => 0x4A,
            Button::Left => 0x10,
            Button::Right => 0x5A,
            Button::Digit0 => 0x98,
            Button::Digit1 => 0xA2,
            Button::Digit2 => 0x62,
            Button::Digit3 => 0xE2,
            Button::Digit4 => 0x22,
            Button::Digit5 => 0x02,
            Button::Digit6 => 0xC2,
            Button::Digit7 => 0xE0,
            Button::Digit8 => 0xA8,
            Button::Digit9 => 0x90,
            Button::Star => 0x68,
            Button::Hash => 0xB0,
        }
    }

    /// Numeric value for digit buttons.
    #[must_use]
    pub const fn digit(self) -> Option<u8> {
        match self {
            Button::Digit0 => Some(0),
            Button::Digit1 => Some(1),
            Button::Digit2 => Some(2),
            Button::Digit3 => Some(3),
            Button::Digit4 => Some(4),
            Button::Digit5 => Some(5),
            Button::Digit6 => Some(6),
            Button::Digit7 => Some(7),
            Button::Digit8 => Some(8),
            Button::Digit9 => Some(9),
            _ => None,
        }
    }

    /// Key legend as printed on the remote.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Button::Digit0 => "0",
            Button::Digit1 => "1",
            Button::Digit2 => "2",
            Button::Digit3 => "3",
            Button::Digit4 => "4",
            Button::Digit5 => "5",
            Button::Digit6 => "6",
            Button::Digit7 => "7",
            Button::Digit8 => "8",
            Button::Digit9 => "9",
            Button::Star => "*",
            Button::Hash => "#",
            Button::Up => "^",
            Button::Down => "V",
            Button::Left => "<",
            Button::Right => ">",
            Button::Ok => "OK",
        }
    }

    /// Parses a key legend (case-insensitive for `OK` and `V`).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        ALL_BUTTONS
            .iter()
            .copied()
            .find(|button| button.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_remote_codes() {
        let fixtures = [
            (0x38, Button::Ok),
            (0x18, Button::Up),
            (0x4A, Button::Down),
            (0x10, Button::Left),
            (0x5A, Button::Right),
            (0x98, Button::Digit0),
            (0xA2, Button::Digit1),
            (0x62, Button::Digit2),
            (0xE2, Button::Digit3),
            (0x22, Button::Digit4),
            (0x02, Button::Digit5),
            (0xC2, Button::Digit6),
            (0xE0, Button::Digit7),
            (0xA8, Button::Digit8),
            (0x90, Button::Digit9),
            (0x68, Button::Star),
            (0xB0, Button::Hash),
        ];

        for (code, button) in fixtures {
            assert_eq!(Button::from_command(code), Some(button), "code {code:#04x}");
            assert_eq!(button.command_byte(), code);
        }
    }

    #[test]
    fn unknown_codes_have_no_match() {
        let known = ALL_BUTTONS.map(Button::command_byte);
        for code in 0..=u8::MAX {
            if !known.contains(&code) {
                assert_eq!(Button::from_command(code), None, "code {code:#04x}");
            }
        }
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!(Button::from_label("ok"), Some(Button::Ok));
        assert_eq!(Button::from_label("v"), Some(Button::Down));
        assert_eq!(Button::from_label("7"), Some(Button::Digit7));
        assert_eq!(Button::from_label("<"), Some(Button::Left));
        assert_eq!(Button::from_label("menu"), None);
        assert_eq!(Button::Digit4.digit(), Some(4));
        assert_eq!(Button::Star.digit(), None);
    }
}
