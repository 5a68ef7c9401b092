//! One-line status messages on stderr.
//!
//! stdout stays free for machine-readable output.

use owo_colors::OwoColorize;

use super::colors_enabled;

#[derive(Clone, Copy)]
enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Info => "ℹ",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }
}

fn emit(level: Level, message: &str) {
    let symbol = level.symbol();
    if !colors_enabled() {
        eprintln!("{symbol} {message}");
        return;
    }
    match level {
        Level::Success => eprintln!("{} {message}", symbol.green().bold()),
        Level::Info => eprintln!("{} {message}", symbol.blue().bold()),
        Level::Warning => eprintln!("{} {}", symbol.yellow().bold(), message.yellow()),
        Level::Error => eprintln!("{} {}", symbol.red().bold(), message.red()),
    }
}

/// ```no_run
/// pagebake_cli::ui::success("Wrote dist/index.html");
/// ```
pub fn success(message: &str) {
    emit(Level::Success, message);
}

pub fn info(message: &str) {
    emit(Level::Info, message);
}

/// Used for non-fatal problems such as a failed sourcemap upload.
pub fn warning(message: &str) {
    emit(Level::Warning, message);
}

pub fn error(message: &str) {
    emit(Level::Error, message);
}
