//! Polling of chassis operations that answered `202 Accepted`.
//!
//! The poll loop is the only place in the crate that waits and retries.
//! It is bounded by wall-clock time (the session timeout) and can be
//! cancelled through a [`CancellationToken`]; the attempt count is not bounded,
//! so the poll interval is what rate-limits load on the chassis.

pub mod descriptor;

pub use descriptor::{AsyncOperationDescriptor, AsyncState};

use crate::error::session::SessionError;
use crate::session::{ChassisRequest, Session};
use crate::translator::resolve_terminal;

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use tokio::time::sleep as TokioSleep;
use tokio_util::sync::CancellationToken;

/// Final result of an asynchronous operation.
///
/// Replaces the "URL or error text in one string" convention: callers match
/// on the variant instead of sniffing the string for `http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncOutcome {
    /// `SUCCESS` or `COMPLETED`, with the URL holding the result.
    Completed { result_url: String },
    /// `ERROR`, with the chassis' message verbatim.
    Failed { message: String },
}

impl AsyncOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AsyncOutcome::Completed { .. })
    }

    pub fn result_url(&self) -> Option<&str> {
        match self {
            AsyncOutcome::Completed { result_url } => Some(result_url),
            AsyncOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            AsyncOutcome::Completed { .. } => None,
            AsyncOutcome::Failed { message } => Some(message),
        }
    }
}

/// Drives one poll loop through a session.
pub struct AsyncOperationPoller<'a> {
    session: &'a Session,
    timeout: Duration,
    poll_interval: Duration,
}

impl<'a> AsyncOperationPoller<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            timeout: session.config().timeout,
            poll_interval: session.config().poll_interval,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Poll until the descriptor reaches a terminal state.
    ///
    /// Each iteration GETs the descriptor's status URL, replaces the
    /// descriptor with the reply, and only then checks the deadline. A
    /// terminal state seen on the poll that crosses the deadline still wins.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AsyncTimeout`] when the deadline passes while `IN_PROGRESS`
    /// - [`SessionError::Cancelled`] when `cancel` fires during a poll or sleep
    /// - [`SessionError::Protocol`] for unknown states or missing fields
    /// - any error from the status request itself
    pub async fn wait(
        &self,
        initial: AsyncOperationDescriptor,
        cancel: &CancellationToken,
    ) -> Result<AsyncOutcome, SessionError> {
        info!("Polling for async operation ...");
        let result = self.poll(initial, cancel).await;
        info!("Completed async operation");
        result
    }

    async fn poll(
        &self,
        initial: AsyncOperationDescriptor,
        cancel: &CancellationToken,
    ) -> Result<AsyncOutcome, SessionError> {
        let mut descriptor = initial;
        let mut status_url = descriptor.url.clone().unwrap_or_default();
        let started = Instant::now();
        let mut attempts: u32 = 0;

        while descriptor.state.is_in_progress() {
            if status_url.is_empty() {
                return Err(SessionError::protocol(
                    "async operation is in progress but has no status 'url' to poll",
                ));
            }

            attempts += 1;
            trace!("Async poll #{attempts} -> {status_url}");

            let request = ChassisRequest::get(status_url.clone());
            let response = tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(SessionError::cancelled(format!(
                        "async operation at {status_url} cancelled after {attempts} polls"
                    )));
                }
                response = self.session.dispatch(&request) => response?,
            };

            descriptor = AsyncOperationDescriptor::from_body(response.body())?;
            if let Some(next_url) = descriptor.url.as_deref().filter(|url| !url.is_empty()) {
                status_url = next_url.to_string();
            }

            if !descriptor.state.is_in_progress() {
                break;
            }

            let elapsed = started.elapsed();
            if elapsed > self.timeout {
                return Err(SessionError::async_timeout(status_url, elapsed, self.timeout));
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(SessionError::cancelled(format!(
                        "async operation at {status_url} cancelled after {attempts} polls"
                    )));
                }
                _ = TokioSleep(self.poll_interval) => {}
            }
        }

        debug!(
            "Async operation reached {} after {attempts} polls in {:?}",
            descriptor.state,
            started.elapsed()
        );

        resolve_terminal(&descriptor)
    }
}
