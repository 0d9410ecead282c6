//! File logging bootstrap.
//!
//! The TUI owns the terminal, so log output goes to rotating files in the
//! profile's data directory. Initialization happens at most once per process.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "warayaki";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGER: OnceLock<(PathBuf, LoggerHandle)> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Unsupported log level: {0}")]
    InvalidLevel(String),
    #[error("Failed to create log directory {0}: {1}")]
    Directory(PathBuf, String),
    #[error("Failed to start logger: {0}")]
    Start(#[from] flexi_logger::FlexiLoggerError),
    #[error("Logging already initialized at {0}")]
    AlreadyInitialized(PathBuf),
}

/// Normalize a configured level name (`error`, `warn`, `info`, `debug`, `trace`)
pub fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => Ok("error"),
        "warn" | "warning" => Ok("warn"),
        "info" => Ok("info"),
        "debug" => Ok("debug"),
        "trace" => Ok("trace"),
        other => Err(LoggingError::InvalidLevel(other.to_string())),
    }
}

/// Start file logging into `log_dir`.
///
/// Calling again with the same directory is a no-op; a different directory is rejected.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;

    if let Some((dir, _)) = LOGGER.get() {
        if dir == log_dir {
            return Ok(());
        }
        return Err(LoggingError::AlreadyInitialized(dir.clone()));
    }

    std::fs::create_dir_all(log_dir)
        .map_err(|e| LoggingError::Directory(log_dir.to_path_buf(), e.to_string()))?;

    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    if LOGGER.set((log_dir.to_path_buf(), handle)).is_err() {
        return Err(LoggingError::AlreadyInitialized(log_dir.to_path_buf()));
    }

    info!(
        "event=app_start module=logging status=ok platform={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level
    );
    Ok(())
}
