use chassis_core::{CoreError, SessionError, ShellError};

use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors reported by the `chassis` command.
///
/// Core errors are flattened to their message and category so the whole
/// enum stays serializable; the location is kept.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum CliError {
    /// Bad arguments or an interrupted run
    #[error("Cli Error: {message} {location}")]
    Cli {
        message: String,
        location: ErrorLocation,
    },

    /// Error from chassis-core operations (session, polling, shell)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        category: &'static str,
        location: ErrorLocation,
    },

    /// Profile or environment could not be loaded
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn cli(message: impl Into<String>) -> Self {
        CliError::Cli {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn config(message: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SessionError> for CliError {
    #[track_caller]
    fn from(error: SessionError) -> Self {
        CliError::Core {
            message: error.to_string(),
            category: error.error_category(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ShellError> for CliError {
    #[track_caller]
    fn from(error: ShellError) -> Self {
        CliError::Core {
            message: error.to_string(),
            category: "shell",
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for CliError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Session(e) => e.into(),
            CoreError::Shell(e) => e.into(),
            CoreError::Config(e) => CliError::config(e.to_string()),
        }
    }
}
