//! File logging.
//!
//! wkswitch runs from a key binding with nowhere to print, so every run
//! appends `[LEVEL] message` lines to a log file instead.  The level comes
//! from the config and can be overridden with `WKSWITCH_LOG` (env_logger
//! filter syntax).

use env_logger::{Builder, Env, Target};
use log::{LevelFilter, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "WKSWITCH_LOG";

/// Keeps the file logger alive for the rest of `main`.
///
/// Dropping the guard flushes the logger, so the last lines make it to disk
/// on every exit path.
#[must_use]
pub struct LogGuard(());

impl Drop for LogGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("logger already initialised: {0}")]
    AlreadyInitialised(#[from] log::SetLoggerError),
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Write one record as `[LEVEL] message`.
fn format_record<W: Write>(buf: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(buf, "[{}] {}", record.level(), record.args())
}

/// Install the global logger writing to `path` at `level`.
pub fn init(path: &Path, level: LevelFilter) -> Result<LogGuard, LoggingError> {
    let file = open_log_file(path)?;
    Builder::new()
        .filter_level(level)
        .parse_env(Env::new().filter(LOG_ENV))
        .format(|buf, record| format_record(buf, record))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(LogGuard(()))
}
