//! Logging setup
//!
//! The crate logs through the `log` facade. Hosts that want files call
//! [`init_logging`] once at startup; without a configured directory the
//! records go to whatever logger the host installed, if any.

use rolling_logger::{LoggerError, LoggerOptions, RollingWriter};

use crate::config::LogConfig;

/// Install the rolling file logger described by `config`.
/// Returns `None` when no log directory is configured.
pub fn init_logging(config: &LogConfig) -> Result<Option<RollingWriter>, LoggerError> {
    let Some(dir) = config.dir.as_ref() else {
        return Ok(None);
    };
    let options = LoggerOptions {
        max_files: config.max_files,
        recent_lines: config.recent_lines,
        ..LoggerOptions::new(&config.file_prefix)
    };
    rolling_logger::init_logger_with(dir, options).map(Some)
}
