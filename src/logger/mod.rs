mod drain;

pub use drain::*;
pub use slog::Level;

use crate::errors::HealStatusError;

/// Parses a level name such as `debug`, `warn` or `warning`.
pub fn parse_level(s: &str) -> Result<Level, HealStatusError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "critical" | "crit" => Ok(Level::Critical),
        "error" => Ok(Level::Error),
        "warning" | "warn" => Ok(Level::Warning),
        "info" => Ok(Level::Info),
        "debug" => Ok(Level::Debug),
        "trace" => Ok(Level::Trace),
        _ => Err(HealStatusError::InvalidLogLevel(s.to_owned())),
    }
}

pub(crate) fn as_log_level(level: Level) -> log::Level {
    match level {
        Level::Critical | Level::Error => log::Level::Error,
        Level::Warning => log::Level::Warn,
        Level::Info => log::Level::Info,
        Level::Debug => log::Level::Debug,
        Level::Trace => log::Level::Trace,
    }
}
