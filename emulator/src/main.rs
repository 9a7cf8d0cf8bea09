mod command;
mod panel;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use crossterm::tty::IsTty;
use pomodoro_core::config::TimerConfig;

use session::Session;

fn main() -> io::Result<()> {
    let transcript = parse_transcript_path().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: pomodoro-emulator [--transcript <path>]");
        process::exit(2);
    });

    let config = TimerConfig::new();
    if let Err(err) = config.validate() {
        eprintln!("invalid timer configuration: {err}");
        process::exit(2);
    }

    let stdin = io::stdin();
    let interactive = stdin.is_tty();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(config, transcript.as_deref())?;
    let mut line = String::new();

    writeln!(
        writer,
        "Pomodoro Emulator ready. Type `help` for commands or `exit` to quit."
    )?;
    for row in session.lcd().render() {
        writeln!(writer, "{row}")?;
    }

    loop {
        line.clear();
        if interactive {
            write!(writer, "> ")?;
            writer.flush()?;
        }

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        let responses = session.handle_command(trimmed)?;
        for response in responses {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_transcript_path() -> Result<Option<PathBuf>, String> {
    let mut args = env::args().skip(1);
    let Some(arg) = args.next() else {
        return Ok(None);
    };

    let path = if let Some(value) = arg.strip_prefix("--transcript=") {
        PathBuf::from(value)
    } else if arg == "--transcript" {
        args.next()
            .map(PathBuf::from)
            .ok_or_else(|| "Expected value after --transcript".to_string())?
    } else {
        return Err(format!("Unknown argument `{arg}`"));
    };

    match args.next() {
        Some(extra) => Err(format!("Unexpected argument `{extra}`")),
        None => Ok(Some(path)),
    }
}
