//! Error taxonomy for chassis sessions.
//!
//! Key design decisions:
//! - HTTP status and body are stored on the error, never only in the message
//! - Transport failures are not retried; only async polling waits
//! - All errors include ErrorLocation for debugging
//! - `#[track_caller]` for automatic location capture

use crate::error::config::ConfigError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use thiserror::Error as ThisError;

/// Appended to 401 errors raised outside the authentication endpoint.
pub const REAUTHENTICATE_HINT: &str = "Please check that your API key is correct or call \
Session::authenticate(username, password) in order to obtain a new API key.";

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("Client Error: {status_code} {reason}: {body}.{suffix} {location}", suffix = hint_suffix(.hint))]
    Client {
        status_code: HttpStatusCode,
        reason: String,
        body: String,
        url: String,
        hint: Option<&'static str>,
        location: ErrorLocation,
    },

    #[error("Async Timeout Error: operation at {status_url} still in progress after {elapsed:?} (limit {timeout:?}) {location}")]
    AsyncTimeout {
        status_url: String,
        elapsed: Duration,
        timeout: Duration,
        location: ErrorLocation,
    },

    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cancelled: {message} {location}")]
    Cancelled {
        message: String,
        location: ErrorLocation,
    },

    #[error("Operation Failed: {message} {location}")]
    OperationFailed {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(hint) => format!("\n{hint}"),
        None => String::new(),
    }
}

impl SessionError {
    #[track_caller]
    pub fn protocol(message: impl Into<String>) -> Self {
        SessionError::Protocol {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cancelled(message: impl Into<String>) -> Self {
        SessionError::Cancelled {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn operation_failed(message: impl Into<String>) -> Self {
        SessionError::OperationFailed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn async_timeout(status_url: impl Into<String>, elapsed: Duration, timeout: Duration) -> Self {
        SessionError::AsyncTimeout {
            status_url: status_url.into(),
            elapsed,
            timeout,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from reqwest error with proper categorization.
    #[track_caller]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        SessionError::Transport {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status code if this error came from a response.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            SessionError::Client { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// True for a 401 from any endpoint.
    pub fn is_auth_failure(&self) -> bool {
        self.status_code()
            .map(|status| status.is_unauthorized())
            .unwrap_or(false)
    }

    /// Get error category for logs.
    pub fn error_category(&self) -> &'static str {
        match self {
            SessionError::Transport { is_timeout: true, .. } => "timeout",
            SessionError::Transport { is_connection: true, .. } => "connection",
            SessionError::Transport { .. } => "transport",
            SessionError::Client { status_code, .. } if status_code.is_unauthorized() => "unauthorized",
            SessionError::Client { .. } => "client_error",
            SessionError::AsyncTimeout { .. } => "async_timeout",
            SessionError::Protocol { .. } => "protocol",
            SessionError::Cancelled { .. } => "cancelled",
            SessionError::OperationFailed { .. } => "operation_failed",
            SessionError::Json { .. } => "json",
            SessionError::UrlParse { .. } => "url_parse",
            SessionError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for SessionError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        SessionError::from_reqwest(&error)
    }
}

impl From<url::ParseError> for SessionError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        SessionError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        SessionError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
