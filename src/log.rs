use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

/// Logger printing to stderr with the elapsed wall-clock time since
/// construction. Stdout stays reserved for solution output.
struct StderrLogger {
    start: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "[{:>9.3}s {:<5}] {}",
            self.start.elapsed().as_secs_f64(),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Installs the stderr logger with a fixed level filter. Subsequent calls
/// are no-ops (relevant when tests initialize logging repeatedly).
pub fn build_stderr_logger_for_level(level: LevelFilter) {
    let logger = StderrLogger {
        start: Instant::now(),
    };

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}

/// Raises the default level filter by the number of `-v` occurrences.
pub fn build_stderr_logger_for_verbosity(default: LevelFilter, verbosity: usize) {
    let levels = [
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base = levels.iter().position(|&l| l == default).unwrap_or(0);
    let level = levels[(base + verbosity).min(levels.len() - 1)];
    build_stderr_logger_for_level(level);
}
