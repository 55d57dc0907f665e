//! Request/response framing over an unframed shell byte stream.
//!
//! A command is one newline-terminated line; its response is everything the
//! shell prints until the accumulated output ends with the prompt marker.

use crate::error::shell::ShellError;

use common::ErrorLocation;

use std::io::{ErrorKind, Read, Write};
use std::panic::Location;
use std::thread::sleep;
use std::time::{Duration, Instant};

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use log::trace;

const READ_CHUNK_SIZE: usize = 9999;
const IDLE_INITIAL_INTERVAL: Duration = Duration::from_millis(10);
const IDLE_MAX_INTERVAL: Duration = Duration::from_millis(250);

/// Raw output of one command, chunk by chunk as the shell delivered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    pub chunks: Vec<String>,
}

impl ShellOutput {
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

/// Framing parameters for a [`PromptChannel`].
#[derive(Debug, Clone)]
pub struct PromptFraming {
    pub prompt: String,
    pub read_timeout: Duration,
    pub settle_delay: Duration,
}

/// A shell stream driven one command at a time.
///
/// `&mut self` on [`PromptChannel::send_command`] keeps exactly one
/// command/response cycle in flight.
pub struct PromptChannel<S> {
    stream: S,
    framing: PromptFraming,
}

impl<S: Read + Write> PromptChannel<S> {
    pub fn new(stream: S, framing: PromptFraming) -> Self {
        Self { stream, framing }
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Send `command` and collect output until the prompt shows up.
    ///
    /// # Errors
    ///
    /// - [`ShellError::Timeout`] when no prompt arrives within the read timeout
    /// - [`ShellError::Closed`] when the stream ends first
    /// - [`ShellError::Io`] for any other read/write failure
    pub fn send_command(&mut self, command: &str) -> Result<ShellOutput, ShellError> {
        let line = if command.ends_with('\n') {
            command.to_string()
        } else {
            format!("{command}\n")
        };

        trace!("Shell <= {}", line.trim_end());
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()?;

        if !self.framing.settle_delay.is_zero() {
            sleep(self.framing.settle_delay);
        }

        self.read_until_prompt()
    }

    /// Collect output until the accumulated text ends with the prompt.
    pub fn read_until_prompt(&mut self) -> Result<ShellOutput, ShellError> {
        let deadline = Instant::now() + self.framing.read_timeout;
        let mut idle = idle_backoff();
        let mut output = ShellOutput::default();
        let mut accumulated = String::new();
        let mut pending = Vec::new();
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];

        loop {
            match self.stream.read(&mut buffer) {
                Ok(0) => {
                    return Err(ShellError::Closed {
                        prompt: self.framing.prompt.clone(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Ok(read) => {
                    pending.extend_from_slice(&buffer[..read]);
                    let chunk = take_complete_utf8(&mut pending);
                    idle.reset();

                    // A read that ended mid-character yields nothing until the rest arrives.
                    if !chunk.is_empty() {
                        trace!("Shell => {chunk:?}");
                        accumulated.push_str(&chunk);
                        output.chunks.push(chunk);

                        if accumulated.ends_with(&self.framing.prompt) {
                            return Ok(output);
                        }
                    }
                }
                // Blocking channels with a session timeout already waited.
                Err(err) if err.kind() == ErrorKind::TimedOut => {}
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                    sleep(idle.next_backoff().unwrap_or(IDLE_MAX_INTERVAL));
                }
                Err(err) => return Err(err.into()),
            }

            if Instant::now() >= deadline {
                accumulated.push_str(&String::from_utf8_lossy(&pending));
                return Err(ShellError::Timeout {
                    prompt: self.framing.prompt.clone(),
                    timeout: self.framing.read_timeout,
                    received: accumulated,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
    }
}

/// Decode the complete UTF-8 prefix of `pending`, leaving a trailing partial
/// character in place for the next read. Invalid sequences become U+FFFD.
pub(crate) fn take_complete_utf8(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();

    loop {
        match std::str::from_utf8(pending) {
            Ok(valid) => {
                text.push_str(valid);
                pending.clear();
                return text;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                text.push_str(&String::from_utf8_lossy(&pending[..valid_up_to]));
                match err.error_len() {
                    None => {
                        pending.drain(..valid_up_to);
                        return text;
                    }
                    Some(invalid) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        pending.drain(..valid_up_to + invalid);
                    }
                }
            }
        }
    }
}

fn idle_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: IDLE_INITIAL_INTERVAL,
        current_interval: IDLE_INITIAL_INTERVAL,
        max_interval: IDLE_MAX_INTERVAL,
        max_elapsed_time: None,
        ..Default::default()
    }
}
