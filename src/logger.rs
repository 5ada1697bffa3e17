//! Minimal stderr backend for the `log` facade.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

/// Apply `-v` / `-q` to the configured level. Quiet wins.
pub fn adjust_level(base: LevelFilter, verbose: usize, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    let mut level = base;
    for _ in 0..verbose {
        level = match level {
            LevelFilter::Off => LevelFilter::Error,
            LevelFilter::Error => LevelFilter::Warn,
            LevelFilter::Warn => LevelFilter::Info,
            LevelFilter::Info => LevelFilter::Debug,
            LevelFilter::Debug | LevelFilter::Trace => LevelFilter::Trace,
        };
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_and_saturates() {
        assert_eq!(adjust_level(LevelFilter::Warn, 0, false), LevelFilter::Warn);
        assert_eq!(adjust_level(LevelFilter::Warn, 1, false), LevelFilter::Info);
        assert_eq!(adjust_level(LevelFilter::Warn, 5, false), LevelFilter::Trace);
        assert_eq!(adjust_level(LevelFilter::Off, 1, false), LevelFilter::Error);
    }

    #[test]
    fn quiet_wins() {
        assert_eq!(adjust_level(LevelFilter::Trace, 3, true), LevelFilter::Error);
    }
}
