//! Logging for the `chassis` command line.
//!
//! Provides dual output (stderr with colors + optional file) with thread-safe
//! initialization. Stdout is left to command results.

use crate::error::CliError;

use std::io::stderr;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Log file name.
pub const LOG_FILE_NAME: &str = "chassis.log";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Level for a run with or without `--verbose`.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize the logger (stderr, plus `chassis.log` when `log_dir` is given).
///
/// This function is safe to call multiple times - subsequent calls will
/// log a warning and return Ok. The actual initialization runs exactly once.
///
/// # Errors
///
/// Returns an error if:
/// - Log file cannot be created
/// - Logger dispatch configuration fails
pub fn initialize(level: LevelFilter, log_dir: Option<&Path>) -> Result<(), CliError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = build_dispatch(level, log_dir).and_then(|dispatch| {
            dispatch
                .apply()
                .map_err(|e| CliError::cli(format!("Failed to initialize logger: {e}")))
        });
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

/// Build the dispatch tree without installing it.
#[track_caller]
pub(crate) fn build_dispatch(level: LevelFilter, log_dir: Option<&Path>) -> Result<Dispatch, CliError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    // Dependencies are noisy at debug; keep them at warn.
    let base_dispatch = Dispatch::new()
        .level(LevelFilter::Warn)
        .level_for("chassis_core", level)
        .level_for("chassis_cli", level)
        .level_for("chassis", level);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        })
        .chain(stderr());

    let mut dispatch = base_dispatch.chain(stderr_dispatch);

    if let Some(log_dir) = log_dir {
        let log_file_path = log_dir.join(LOG_FILE_NAME);
        let log_file = fern::log_file(&log_file_path).map_err(|e| {
            CliError::config(format!(
                "Failed to create log file {}: {e}",
                log_file_path.display()
            ))
        })?;

        let file_dispatch = Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0)
                ))
            })
            .chain(log_file);

        dispatch = dispatch.chain(file_dispatch);
    }

    Ok(dispatch)
}
