use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;
use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ShellError {
    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },

    #[error("Auth Error: {message} {location}")]
    Auth {
        message: String,
        location: ErrorLocation,
    },

    #[error("Channel Error: {message} {location}")]
    Channel {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Timeout Error: no prompt '{prompt}' within {timeout:?}; received {received:?} {location}")]
    Timeout {
        prompt: String,
        timeout: Duration,
        received: String,
        location: ErrorLocation,
    },

    #[error("Closed Error: shell closed before prompt '{prompt}' was seen {location}")]
    Closed {
        prompt: String,
        location: ErrorLocation,
    },

    #[error("Output Error: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
    },

    #[error("Join Error: {message} {location}")]
    Join {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ShellError {
    #[track_caller]
    pub fn connect(message: impl Into<String>) -> Self {
        ShellError::Connect {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn auth(message: impl Into<String>) -> Self {
        ShellError::Auth {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn channel(message: impl Into<String>) -> Self {
        ShellError::Channel {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn output(message: impl Into<String>) -> Self {
        ShellError::Output {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<IoError> for ShellError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ShellError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: error,
        }
    }
}

impl From<ssh2::Error> for ShellError {
    #[track_caller]
    fn from(error: ssh2::Error) -> Self {
        ShellError::channel(error.to_string())
    }
}

impl From<tokio::task::JoinError> for ShellError {
    #[track_caller]
    fn from(error: tokio::task::JoinError) -> Self {
        ShellError::Join {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
