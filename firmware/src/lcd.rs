//! HD44780 character LCD behind a PCF8574 I²C expander.
//!
//! The expander drives the panel in 4-bit mode. Each expander byte carries
//! one nibble on D4..D7 plus the RS, EN, and backlight lines; a nibble is
//! latched by writing it once with EN high and once with EN low.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use pomodoro_core::display::{LCD_ROWS, TextDisplay};

use crate::telemetry::log_display_error;

/// Default 7-bit address of the PCF8574 backpack.
pub const DEFAULT_ADDRESS: u8 = 0x27;

const RS: u8 = 1 << 0;
const EN: u8 = 1 << 2;
const BACKLIGHT: u8 = 1 << 3;

const CLEAR_DISPLAY: u8 = 0x01;
const RETURN_HOME: u8 = 0x02;
const ENTRY_MODE_INCREMENT: u8 = 0x06;
const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
const DISPLAY_ON_CURSOR_BLINK: u8 = 0x0F;
const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
const SET_DDRAM_ADDRESS: u8 = 0x80;

/// DDRAM offset of each row on a two-line panel.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];
/// Addressable DDRAM columns per row.
const DDRAM_COLUMNS: u8 = 40;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LcdError<E> {
    Bus(E),
    PositionOutOfRange { row: u8, column: u8 },
}

impl<E: fmt::Debug> fmt::Display for LcdError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcdError::Bus(error) => write!(f, "i2c bus error: {error:?}"),
            LcdError::PositionOutOfRange { row, column } => {
                write!(f, "cursor position ({row}, {column}) out of range")
            }
        }
    }
}

pub struct Hd44780<I2C, D> {
    bus: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(bus: I2C, delay: D) -> Self {
        Self::with_address(bus, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(bus: I2C, delay: D, address: u8) -> Self {
        Self {
            bus,
            delay,
            address,
        }
    }

    /// Runs the 4-bit power-up sequence and leaves the display cleared with
    /// the cursor hidden.
    pub fn init(&mut self) -> Result<(), LcdError<I2C::Error>> {
        self.delay.delay_ms(50);
        self.write_expander(BACKLIGHT)?;

        self.write_nibble(0x03, false)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02, false)?;
        self.delay.delay_us(150);

        self.command(FUNCTION_SET_4BIT_2LINE)?;
        self.command(DISPLAY_ON_CURSOR_OFF)?;
        self.command(CLEAR_DISPLAY)?;
        self.command(ENTRY_MODE_INCREMENT)
    }

    pub fn command(&mut self, command: u8) -> Result<(), LcdError<I2C::Error>> {
        self.write_byte(command, false)?;
        if command == CLEAR_DISPLAY || command == RETURN_HOME {
            self.delay.delay_ms(2);
        }
        Ok(())
    }

    pub fn write_data(&mut self, data: u8) -> Result<(), LcdError<I2C::Error>> {
        self.write_byte(data, true)
    }

    pub fn write_str(&mut self, text: &str) -> Result<(), LcdError<I2C::Error>> {
        text.bytes().try_for_each(|byte| self.write_data(byte))
    }

    pub fn set_position(&mut self, row: u8, column: u8) -> Result<(), LcdError<I2C::Error>> {
        let offset = ROW_OFFSETS
            .get(usize::from(row))
            .copied()
            .filter(|_| row < LCD_ROWS && column < DDRAM_COLUMNS)
            .ok_or(LcdError::PositionOutOfRange { row, column })?;
        self.command(SET_DDRAM_ADDRESS | (offset + column))
    }

    pub fn set_blink(&mut self, enabled: bool) -> Result<(), LcdError<I2C::Error>> {
        self.command(if enabled {
            DISPLAY_ON_CURSOR_BLINK
        } else {
            DISPLAY_ON_CURSOR_OFF
        })
    }

    pub fn release(self) -> (I2C, D) {
        (self.bus, self.delay)
    }

    fn write_byte(&mut self, value: u8, data: bool) -> Result<(), LcdError<I2C::Error>> {
        self.write_nibble(value >> 4, data)?;
        self.write_nibble(value & 0x0F, data)
    }

    fn write_nibble(&mut self, nibble: u8, data: bool) -> Result<(), LcdError<I2C::Error>> {
        let mut byte = (nibble << 4) | BACKLIGHT;
        if data {
            byte |= RS;
        }
        self.write_expander(byte | EN)?;
        self.delay.delay_us(1);
        self.write_expander(byte)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_expander(&mut self, byte: u8) -> Result<(), LcdError<I2C::Error>> {
        self.bus.write(self.address, &[byte]).map_err(LcdError::Bus)
    }
}

/// Bus errors are logged and dropped; the next full redraw repaints the panel.
impl<I2C, D> TextDisplay for Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn clear(&mut self) {
        if self.command(CLEAR_DISPLAY).is_err() {
            log_display_error("clear");
        }
    }

    fn move_cursor(&mut self, row: u8, column: u8) {
        if self.set_position(row, column).is_err() {
            log_display_error("move-cursor");
        }
    }

    fn write_text(&mut self, text: &str) {
        if self.write_str(text).is_err() {
            log_display_error("write");
        }
    }

    fn set_cursor_blink(&mut self, enabled: bool) {
        if self.set_blink(enabled).is_err() {
            log_display_error("blink");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    #[derive(Default)]
    struct BusMock {
        writes: Vec<(u8, u8)>,
        fail: bool,
    }

    impl ErrorType for BusMock {
        type Error = ErrorKind;
    }

    impl I2c for BusMock {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for operation in operations {
                if let Operation::Write(bytes) = operation {
                    self.writes.extend(bytes.iter().map(|byte| (address, *byte)));
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct DelayMock {
        total_ns: u64,
    }

    impl DelayNs for DelayMock {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    /// Nibbles latched by the panel: the value present while EN was high.
    fn latched(writes: &[(u8, u8)]) -> Vec<(u8, bool)> {
        writes
            .iter()
            .filter(|(_, byte)| byte & EN != 0)
            .map(|(_, byte)| (byte >> 4, byte & RS != 0))
            .collect()
    }

    fn bytes(nibbles: &[(u8, bool)]) -> Vec<(u8, bool)> {
        nibbles
            .chunks(2)
            .map(|pair| ((pair[0].0 << 4) | pair[1].0, pair[0].1))
            .collect()
    }

    #[test]
    fn init_sends_power_up_sequence() {
        let mut lcd = Hd44780::new(BusMock::default(), DelayMock::default());
        lcd.init().expect("init should succeed");
        let (bus, delay) = lcd.release();

        assert!(bus.writes.iter().all(|(address, byte)| {
            *address == DEFAULT_ADDRESS && byte & BACKLIGHT != 0
        }));
        assert!(delay.total_ns >= 50_000_000);

        let nibbles = latched(&bus.writes);
        let wake: Vec<u8> = nibbles[..4].iter().map(|(nibble, _)| *nibble).collect();
        assert_eq!(wake, [0x3, 0x3, 0x3, 0x2]);
        assert_eq!(
            bytes(&nibbles[4..]),
            [(0x28, false), (0x0C, false), (0x01, false), (0x06, false)]
        );
    }

    #[test]
    fn text_lands_at_row_offset() {
        let mut lcd = Hd44780::new(BusMock::default(), DelayMock::default());
        lcd.move_cursor(1, 3);
        lcd.write_text("Hi");
        lcd.set_cursor_blink(true);
        let (bus, _) = lcd.release();

        assert_eq!(
            bytes(&latched(&bus.writes)),
            [(0xC3, false), (b'H', true), (b'i', true), (0x0F, false)]
        );
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let mut lcd = Hd44780::new(BusMock::default(), DelayMock::default());
        assert_eq!(
            lcd.set_position(2, 0),
            Err(LcdError::PositionOutOfRange { row: 2, column: 0 })
        );
        assert_eq!(
            lcd.set_position(0, 40),
            Err(LcdError::PositionOutOfRange { row: 0, column: 40 })
        );
        let (bus, _) = lcd.release();
        assert!(bus.writes.is_empty());
    }

    #[test]
    fn bus_errors_are_swallowed_at_display_seam() {
        let bus = BusMock {
            fail: true,
            ..BusMock::default()
        };
        let mut lcd = Hd44780::new(bus, DelayMock::default());

        assert_eq!(lcd.command(CLEAR_DISPLAY), Err(LcdError::Bus(ErrorKind::Other)));
        lcd.clear();
        lcd.write_text("still running");
    }
}
