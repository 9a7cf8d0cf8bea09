//! Two-digit minute values edited on the configuration screens.

use core::fmt;

/// Digit selected for direct digit-button writes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum EditCursor {
    #[default]
    Tens,
    Units,
}

/// A minute count in `1..=99`, stored as its two decimal digits.
///
/// Every operation that would produce `00` substitutes a non-zero value, so a
/// loaded countdown can never start already expired.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MinuteValue {
    tens: u8,
    units: u8,
}

impl MinuteValue {
    /// One minute, the power-on default for both focus and rest.
    pub const ONE: Self = Self { tens: 0, units: 1 };

    /// Ninety-nine minutes, the largest representable value.
    pub const MAX: Self = Self { tens: 9, units: 9 };

    /// Builds a value from a minute count in `1..=99`.
    #[must_use]
    pub const fn from_minutes(minutes: u8) -> Option<Self> {
        if minutes == 0 || minutes > 99 {
            None
        } else {
            Some(Self {
                tens: minutes / 10,
                units: minutes % 10,
            })
        }
    }

    /// Builds a value from two decimal digits. `0, 0` is rejected.
    #[must_use]
    pub const fn from_digits(tens: u8, units: u8) -> Option<Self> {
        if tens > 9 || units > 9 {
            return None;
        }
        Self::from_minutes(tens * 10 + units)
    }

    #[must_use]
    pub const fn tens(self) -> u8 {
        self.tens
    }

    #[must_use]
    pub const fn units(self) -> u8 {
        self.units
    }

    /// Returns the value as a minute count.
    #[must_use]
    pub const fn minutes(self) -> u8 {
        self.tens * 10 + self.units
    }

    /// Returns the digit under `cursor`.
    #[must_use]
    pub const fn digit(self, cursor: EditCursor) -> u8 {
        match cursor {
            EditCursor::Tens => self.tens,
            EditCursor::Units => self.units,
        }
    }

    /// Adds one minute modulo 100; `00` becomes `01`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self::wrapped((self.minutes() + 1) % 100, Self::ONE)
    }

    /// Subtracts one minute modulo 100; `00` becomes `99`.
    #[must_use]
    pub const fn decremented(self) -> Self {
        Self::wrapped((self.minutes() + 99) % 100, Self::MAX)
    }

    /// Overwrites the digit under `cursor`.
    ///
    /// Digits above 9 leave the value unchanged. A write that would produce
    /// `00` stores `01`.
    #[must_use]
    pub const fn with_digit(self, cursor: EditCursor, digit: u8) -> Self {
        if digit > 9 {
            return self;
        }
        let (tens, units) = match cursor {
            EditCursor::Tens => (digit, self.units),
            EditCursor::Units => (self.tens, digit),
        };
        Self::wrapped(tens * 10 + units, Self::ONE)
    }

    /// ASCII rendering of the two digits.
    #[must_use]
    pub const fn to_ascii(self) -> [u8; 2] {
        [b'0' + self.tens, b'0' + self.units]
    }

    const fn wrapped(minutes: u8, zero_becomes: Self) -> Self {
        match Self::from_minutes(minutes) {
            Some(value) => value,
            None => zero_becomes,
        }
    }
}

impl Default for MinuteValue {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for MinuteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tens, self.units)
    }
}
