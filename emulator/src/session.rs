use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use pomodoro_core::app::PomodoroApp;
use pomodoro_core::config::TimerConfig;
use pomodoro_core::ir::{CaptureOutcome, FrameAssembler, NecFrame, PulseTiming, RawFrame};
use pomodoro_core::phase::Event;
use pomodoro_core::remote::Button;
use pomodoro_core::reset::{ResampleOutcome, ResetSupervisor};
use pomodoro_core::telemetry::EventId;

use crate::command::{Command, parse_command};
use crate::panel::{ConsoleBuzzer, SimInstant, VirtualLcd};

/// Address byte the emulated remote transmits.
pub const REMOTE_ADDRESS: u8 = 0x00;

const ONE_SECOND_US: u32 = 1_000_000;
/// Longest a single `tick` command may advance: two 99-minute countdowns.
pub const MAX_TICKS_PER_COMMAND: u32 = 2 * 99 * 60;
const STATUS_TELEMETRY_TAIL: usize = 8;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("press", "press <label>      - send a remote button (0-9 * # ^ V < > OK)"),
    ("frame", "frame <hex>        - send a raw 32-bit frame word"),
    ("ir", "ir <ticks>...      - feed capture intervals to the decoder"),
    ("tick", "tick [count]       - advance the clock by whole seconds (at most 11880)"),
    ("reset", "reset [bounce]     - press the reset button"),
    ("lcd", "lcd                - show the panel"),
    ("status", "status             - show timer state and recent telemetry"),
    ("help", "help [topic]       - show help for a command"),
];

type EmulatedApp = PomodoroApp<VirtualLcd, ConsoleBuzzer, SimInstant>;

pub struct Session {
    app: EmulatedApp,
    assembler: FrameAssembler,
    supervisor: ResetSupervisor<SimInstant>,
    timing: PulseTiming,
    clock: SimInstant,
    next_record: EventId,
    frames_dispatched: u32,
    intervals_ignored: u32,
    reset_bounces: u32,
    transcript: Option<TranscriptLogger>,
}

impl Session {
    pub fn new(config: TimerConfig, transcript: Option<&Path>) -> io::Result<Self> {
        let transcript = transcript.map(TranscriptLogger::new).transpose()?;
        let mut app = EmulatedApp::new(config, VirtualLcd::new(), ConsoleBuzzer::default());
        app.start();

        Ok(Self {
            app,
            assembler: FrameAssembler::new(config.thresholds),
            supervisor: ResetSupervisor::new(config.reset_settle),
            timing: config.pulse_timing,
            clock: SimInstant::default(),
            next_record: 0,
            frames_dispatched: 0,
            intervals_ignored: 0,
            reset_bounces: 0,
            transcript,
        })
    }

    pub fn lcd(&self) -> &VirtualLcd {
        self.app.display()
    }

    pub fn app(&self) -> &EmulatedApp {
        &self.app
    }

    pub fn clock(&self) -> SimInstant {
        self.clock
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Vec<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        self.record(TranscriptRole::Host, &[trimmed.to_string()])?;

        let lines = match parse_command(trimmed) {
            Ok(command) => self.execute(command),
            Err(error) => vec![format!("ERR syntax {error}")],
        };

        self.record(TranscriptRole::Emulator, &lines)?;
        Ok(lines)
    }

    fn execute(&mut self, command: Command) -> Vec<String> {
        let mut lines = Vec::new();
        match command {
            Command::Press(button) => {
                lines.push(format!("tx {button} command={:#04x}", button.command_byte()));
                let intervals = NecFrame::new(REMOTE_ADDRESS, button.command_byte())
                    .to_intervals(&self.timing);
                self.feed_intervals(&intervals, &mut lines);
                self.push_lcd(&mut lines);
            }
            Command::Frame(bits) => {
                let frame = RawFrame::from_bits(bits);
                let decoded = frame.decode();
                lines.push(format!(
                    "tx frame {bits:#010x} command={:#04x} ({})",
                    decoded.command,
                    Button::from_command(decoded.command)
                        .map_or("unmapped", Button::label)
                ));
                self.feed_intervals(&frame.to_intervals(&self.timing), &mut lines);
                self.push_lcd(&mut lines);
            }
            Command::Intervals(intervals) => {
                self.feed_intervals(&intervals, &mut lines);
                lines.push(format!(
                    "decoder holds {} symbol(s){}",
                    self.assembler.len(),
                    if self.assembler.is_armed() { "" } else { " (disarmed)" }
                ));
            }
            Command::Tick(count) if count > MAX_TICKS_PER_COMMAND => {
                lines.push(format!(
                    "ERR tick count {count} exceeds {MAX_TICKS_PER_COMMAND}"
                ));
            }
            Command::Tick(count) => {
                for _ in 0..count {
                    self.clock.advance_micros(ONE_SECOND_US);
                    self.dispatch(Event::TickElapsed, &mut lines);
                }
                self.push_lcd(&mut lines);
            }
            Command::Reset { bounce } => {
                self.press_reset(bounce, &mut lines);
                self.push_lcd(&mut lines);
            }
            Command::Lcd => self.push_lcd(&mut lines),
            Command::Status => self.push_status(&mut lines),
            Command::Help(topic) => push_help(topic.as_deref(), &mut lines),
        }
        lines
    }

    fn feed_intervals(&mut self, intervals: &[u32], lines: &mut Vec<String>) {
        for &interval in intervals {
            self.clock.advance_micros(interval);
            match self.assembler.push_interval(interval) {
                CaptureOutcome::FrameReady => {
                    if let Some(frame) = self.assembler.take_frame() {
                        self.frames_dispatched += 1;
                        self.dispatch(Event::FrameReady(frame), lines);
                    }
                }
                CaptureOutcome::Ignored => self.intervals_ignored += 1,
                CaptureOutcome::Accepted { .. } | CaptureOutcome::Discarded { .. } => {}
            }
        }
    }

    fn press_reset(&mut self, bounce: bool, lines: &mut Vec<String>) {
        let deadline = self.supervisor.on_edge(self.clock);
        self.clock = deadline;

        match self.supervisor.resample(self.clock, !bounce) {
            ResampleOutcome::Confirmed => self.dispatch(Event::ResetConfirmed, lines),
            ResampleOutcome::Rejected => {
                self.reset_bounces += 1;
                lines.push("reset released before settle; ignored".to_string());
            }
            ResampleOutcome::Pending | ResampleOutcome::Idle => {}
        }
    }

    fn dispatch(&mut self, event: Event, lines: &mut Vec<String>) {
        let summary = self.app.dispatch(event, self.clock);
        if summary.rearm_decoder {
            self.assembler.rearm();
        }

        for note in self.app.buzzer_mut().take_notes() {
            lines.push(format!("{} {note}", self.clock));
        }
        self.push_new_records(lines);
    }

    fn push_new_records(&mut self, lines: &mut Vec<String>) {
        for record in self.app.telemetry().oldest_first() {
            if record.id.wrapping_sub(self.next_record) > EventId::MAX / 2 {
                continue;
            }
            lines.push(format!(
                "{} telemetry:{} code={:#06x} {}",
                record.timestamp,
                record.id,
                record.event.to_raw(),
                record.event
            ));
            self.next_record = record.id.wrapping_add(1);
        }
    }

    fn push_lcd(&self, lines: &mut Vec<String>) {
        lines.extend(self.lcd().render());
    }

    fn push_status(&self, lines: &mut Vec<String>) {
        let controller = self.app.controller();
        let countdown = controller.countdown();
        lines.push(format!(
            "phase={} focus={} rest={} cursor={}",
            controller.phase().kind(),
            controller.focus(),
            controller.rest(),
            controller
                .cursor()
                .map_or_else(|| "-".to_string(), |cursor| format!("{cursor:?}").to_lowercase())
        ));
        lines.push(format!(
            "countdown={countdown} active={} buzzer={} chimes={}",
            countdown.is_active(),
            if self.app.buzzer().is_on() { "on" } else { "off" },
            self.app.buzzer().chimes()
        ));
        lines.push(format!(
            "clock={} frames={} ignored-intervals={} reset-bounces={} telemetry={}",
            self.clock,
            self.frames_dispatched,
            self.intervals_ignored,
            self.reset_bounces,
            self.app.telemetry().total_recorded()
        ));

        let telemetry = self.app.telemetry();
        let skip = telemetry.len().saturating_sub(STATUS_TELEMETRY_TAIL);
        for record in telemetry.oldest_first().skip(skip) {
            lines.push(format!(
                "  {} #{} {}",
                record.timestamp, record.id, record.event
            ));
        }
    }

    fn record(&mut self, role: TranscriptRole, lines: &[String]) -> io::Result<()> {
        if let Some(transcript) = self.transcript.as_mut() {
            for line in lines {
                transcript.append_line(self.clock, role, line)?;
            }
        }
        Ok(())
    }
}

fn push_help(topic: Option<&str>, lines: &mut Vec<String>) {
    match topic {
        Some(target) => {
            if let Some((_, detail)) = HELP_TOPICS.iter().find(|(name, _)| *name == target) {
                lines.push((*detail).to_string());
            } else {
                lines.push(format!("No help available for `{target}`."));
                lines.push(format!("Available topics: {}", help_topic_list()));
            }
        }
        None => {
            lines.push("Available commands:".to_string());
            for (_, detail) in HELP_TOPICS {
                lines.push(format!("  {detail}"));
            }
            lines.push("Type `help <topic>` for a specific command.".to_string());
        }
    }
}

fn help_topic_list() -> String {
    HELP_TOPICS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

struct TranscriptLogger {
    writer: BufWriter<fs::File>,
}

impl TranscriptLogger {
    fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: BufWriter::new(file),
        };
        logger.write_header()?;
        Ok(logger)
    }

    fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.writer, "# Pomodoro emulator transcript")?;
        writeln!(
            self.writer,
            "# Timestamps are simulated milliseconds since session start"
        )?;
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn append_line(
        &mut self,
        clock: SimInstant,
        role: TranscriptRole,
        line: &str,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "[+{:>8} ms] {} {}",
            clock.as_millis(),
            role.prefix(),
            line
        )?;
        self.writer.flush()
    }
}

#[derive(Copy, Clone)]
enum TranscriptRole {
    Host,
    Emulator,
}

impl TranscriptRole {
    fn prefix(self) -> &'static str {
        match self {
            TranscriptRole::Host => "HOST>",
            TranscriptRole::Emulator => "EMU <",
        }
    }
}
