use crate::error::session::SessionError;

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

const STATE_IN_PROGRESS: &str = "IN_PROGRESS";
const STATE_SUCCESS: &str = "SUCCESS";
const STATE_COMPLETED: &str = "COMPLETED";
const STATE_ERROR: &str = "ERROR";

/// State of a chassis-side asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AsyncState {
    InProgress,
    Success,
    Completed,
    Error,
    /// Anything the chassis sends that we do not know about.
    Other(String),
}

impl AsyncState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, AsyncState::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AsyncState::InProgress => STATE_IN_PROGRESS,
            AsyncState::Success => STATE_SUCCESS,
            AsyncState::Completed => STATE_COMPLETED,
            AsyncState::Error => STATE_ERROR,
            AsyncState::Other(state) => state,
        }
    }
}

impl From<String> for AsyncState {
    fn from(state: String) -> Self {
        match state.as_str() {
            STATE_IN_PROGRESS => AsyncState::InProgress,
            STATE_SUCCESS => AsyncState::Success,
            STATE_COMPLETED => AsyncState::Completed,
            STATE_ERROR => AsyncState::Error,
            _ => AsyncState::Other(state),
        }
    }
}

impl fmt::Display for AsyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a 202 reply and of every status poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncOperationDescriptor {
    pub state: AsyncState,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub result_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AsyncOperationDescriptor {
    /// Parse a descriptor; a missing body or missing `state` is a protocol error.
    pub fn from_body(body: Option<&Value>) -> Result<Self, SessionError> {
        let body = body.ok_or_else(|| {
            SessionError::protocol("async operation reply has no JSON body")
        })?;

        serde_json::from_value(body.clone()).map_err(|e| {
            SessionError::protocol(format!("malformed async operation descriptor {body}: {e}"))
        })
    }

    /// Parse the descriptor of a fresh 202, which must name its status URL.
    pub fn from_accepted(body: Option<&Value>) -> Result<Self, SessionError> {
        let descriptor = Self::from_body(body)?;
        if descriptor.url.as_deref().map(str::is_empty).unwrap_or(true) {
            return Err(SessionError::protocol(
                "202 Accepted reply is missing the operation status 'url'",
            ));
        }
        Ok(descriptor)
    }
}
