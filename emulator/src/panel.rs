//! Host stand-ins for the board: a simulated clock, a 16x2 text panel, and a
//! buzzer that narrates its state changes.

use std::fmt;
use std::ops::Add;
use std::time::Duration;

use pomodoro_core::display::{Buzzer, LCD_COLUMNS, LCD_ROWS, TextDisplay};

/// Microseconds since the session started. Only moves when commands advance it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimInstant(u64);

impl SimInstant {
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    pub fn advance_micros(&mut self, micros: u32) {
        self.0 = self.0.saturating_add(u64::from(micros));
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(micros))
    }
}

impl fmt::Display for SimInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}ms", self.as_millis())
    }
}

const COLUMNS: usize = LCD_COLUMNS as usize;
const ROWS: usize = LCD_ROWS as usize;

/// Visible 16x2 window of the panel. Text past the last column is clipped.
#[derive(Clone, Debug)]
pub struct VirtualLcd {
    cells: [[char; COLUMNS]; ROWS],
    row: u8,
    column: u8,
    blink: bool,
}

impl VirtualLcd {
    pub fn new() -> Self {
        Self {
            cells: [[' '; COLUMNS]; ROWS],
            row: 0,
            column: 0,
            blink: false,
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> (u8, u8) {
        (self.row, self.column)
    }

    pub fn is_blinking(&self) -> bool {
        self.blink
    }

    /// Framed panel contents, one string per output line.
    pub fn render(&self) -> Vec<String> {
        let border = format!("+{}+", "-".repeat(COLUMNS));
        let mut lines = vec![border.clone()];
        for row in 0..ROWS {
            lines.push(format!("|{}|", self.row_text(row)));
        }
        lines.push(border);
        if self.blink {
            lines.push(format!("cursor blinking at row {} column {}", self.row, self.column));
        }
        lines
    }
}

impl Default for VirtualLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDisplay for VirtualLcd {
    fn clear(&mut self) {
        self.cells = [[' '; COLUMNS]; ROWS];
        self.row = 0;
        self.column = 0;
    }

    fn move_cursor(&mut self, row: u8, column: u8) {
        self.row = row.min(LCD_ROWS - 1);
        self.column = column;
    }

    fn write_text(&mut self, text: &str) {
        let row = usize::from(self.row);
        for ch in text.chars() {
            if let Some(cell) = self.cells[row].get_mut(usize::from(self.column)) {
                *cell = ch;
            }
            self.column = self.column.saturating_add(1);
        }
    }

    fn set_cursor_blink(&mut self, enabled: bool) {
        self.blink = enabled;
    }
}

/// Buzzer that remembers its level and queues a note for each audible change.
#[derive(Debug, Default)]
pub struct ConsoleBuzzer {
    on: bool,
    chimes: u32,
    notes: Vec<&'static str>,
}

impl ConsoleBuzzer {
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn chimes(&self) -> u32 {
        self.chimes
    }

    pub fn take_notes(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.notes)
    }
}

impl Buzzer for ConsoleBuzzer {
    fn assert(&mut self) {
        if !self.on {
            self.notes.push("buzzer on");
        }
        self.on = true;
    }

    fn release(&mut self) {
        if self.on {
            self.notes.push("buzzer off");
        }
        self.on = false;
    }

    fn chime(&mut self) {
        self.chimes += 1;
        self.notes.push("chime");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_clipped_to_visible_columns() {
        let mut lcd = VirtualLcd::new();
        lcd.move_cursor(1, 12);
        lcd.write_text("123456");
        assert_eq!(lcd.row_text(1), "            1234");
        assert_eq!(lcd.cursor(), (1, 18));
    }

    #[test]
    fn clear_blanks_panel_and_homes_cursor() {
        let mut lcd = VirtualLcd::new();
        lcd.write_text("FOCUS!");
        lcd.move_cursor(1, 4);
        lcd.clear();
        assert_eq!(lcd.row_text(0), " ".repeat(16));
        assert_eq!(lcd.cursor(), (0, 0));
    }

    #[test]
    fn render_frames_both_rows() {
        let mut lcd = VirtualLcd::new();
        lcd.write_text("REST!");
        lcd.set_cursor_blink(true);
        let lines = lcd.render();
        assert_eq!(lines[0], "+----------------+");
        assert_eq!(lines[1], "|REST!           |");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn buzzer_notes_only_level_changes() {
        let mut buzzer = ConsoleBuzzer::default();
        buzzer.release();
        buzzer.assert();
        buzzer.assert();
        buzzer.release();
        buzzer.chime();
        assert_eq!(buzzer.take_notes(), ["buzzer on", "buzzer off", "chime"]);
        assert!(buzzer.take_notes().is_empty());
        assert_eq!(buzzer.chimes(), 1);
    }

    #[test]
    fn sim_instant_adds_durations() {
        let start = SimInstant::from_micros(500);
        let later = start + Duration::from_millis(20);
        assert_eq!(later.as_micros(), 20_500);
        assert_eq!(later.to_string(), "+20ms");
    }
}
