//! Maps HTTP failures and async terminal states onto [`SessionError`].
//!
//! Two inputs produce errors: a 4xx response, and an async descriptor whose
//! state ends polling. Both keep the original status/body/state visible in the
//! resulting error.

use crate::async_op::{AsyncOperationDescriptor, AsyncOutcome, AsyncState};
use crate::error::session::{REAUTHENTICATE_HINT, SessionError};
use crate::session::endpoint::ChassisEndpoint;
use crate::transport::Response;

use common::ErrorLocation;

use std::panic::Location;

/// Turn a 4xx response into a client error. Every other status passes.
///
/// A 401 from anything other than the authentication endpoint carries the
/// re-authentication hint.
#[track_caller]
pub fn check_status(response: &Response) -> Result<(), SessionError> {
    if !response.status.is_client_error() {
        return Ok(());
    }

    let hint = if response.status.is_unauthorized() && !ChassisEndpoint::is_auth_url(&response.url) {
        Some(REAUTHENTICATE_HINT)
    } else {
        None
    };

    Err(SessionError::Client {
        status_code: response.status,
        reason: response.reason.clone(),
        body: response.body_for_display(),
        url: response.url.to_string(),
        hint,
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Map a terminal descriptor to its outcome.
///
/// `SUCCESS`/`COMPLETED` need a `resultUrl`; `ERROR` yields its message as a
/// value. Anything else (including a stray `IN_PROGRESS`) is a protocol error.
#[track_caller]
pub fn resolve_terminal(descriptor: &AsyncOperationDescriptor) -> Result<AsyncOutcome, SessionError> {
    match &descriptor.state {
        AsyncState::Success | AsyncState::Completed => {
            let result_url = descriptor.result_url.clone().ok_or_else(|| {
                SessionError::protocol(format!(
                    "async operation reported {} without a resultUrl",
                    descriptor.state
                ))
            })?;
            Ok(AsyncOutcome::Completed { result_url })
        }
        AsyncState::Error => Ok(AsyncOutcome::Failed {
            message: descriptor.message.clone().unwrap_or_default(),
        }),
        AsyncState::InProgress => Err(SessionError::protocol(
            "async operation is still in progress and has no outcome yet",
        )),
        AsyncState::Other(state) => Err(SessionError::protocol(format!(
            "unrecognized async state '{state}'"
        ))),
    }
}
