use core::fmt::Display;
use log::{Level, LevelFilter, Log};
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Line-per-record logger on stderr. Stdout is reserved for file content.
struct StderrLogger {
    color: AtomicBool,
}

static LOGGER: StderrLogger = StderrLogger { color: AtomicBool::new(false) };

impl StderrLogger {
    fn write_with_color(&self, out: &mut impl Write, color: Color, string: impl Display) {
        if !self.color.load(Ordering::Relaxed) {
            let _ = write!(out, "{string}");
            return;
        }
        let string: &dyn Display = match color {
            Color::Default => &string,
            Color::Gray => &string.dimmed(),
            Color::BrightRed => &string.bright_red(),
            Color::BrightYellow => &string.bright_yellow(),
            Color::BrightBlue => &string.bright_blue(),
            Color::BrightCyan => &string.bright_cyan(),
            Color::BrightMagenta => &string.bright_magenta(),
        };
        let _ = write!(out, "{string}");
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let stderr = io::stderr();
        let mut out = stderr.lock();
        let level = record.level();
        self.write_with_color(
            &mut out,
            match level {
                Level::Error => Color::BrightRed,
                Level::Warn => Color::BrightYellow,
                Level::Info => Color::BrightBlue,
                Level::Debug => Color::BrightCyan,
                Level::Trace => Color::BrightMagenta,
            },
            format_args!("{level:5} "),
        );
        self.write_with_color(&mut out, Color::Gray, format_args!("[{}] ", record.target()));
        self.write_with_color(&mut out, Color::Default, record.args());
        let _ = writeln!(out);
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Map the number of `-v` flags to a level; warnings and errors always show.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    LOGGER.color.store(io::stderr().is_terminal(), Ordering::Relaxed);
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}

enum Color {
    Default,
    Gray,
    BrightRed,
    BrightYellow,
    BrightBlue,
    BrightCyan,
    BrightMagenta,
}
