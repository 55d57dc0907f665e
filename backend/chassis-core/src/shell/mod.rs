//! Interactive shell bridge for chassis features without a REST path.
//!
//! Opens an SSH shell, drives it line by line through a [`PromptChannel`],
//! and closes channel and connection when the [`ShellBridge`] is dropped,
//! including on early returns and errors.
//!
//! Everything here is blocking (libssh2). Async callers go through
//! [`license_check::license_check`], which runs on the blocking pool.

pub mod license_check;
pub mod prompt;

pub use license_check::{LicenseCheckOperation, license_check};
pub use prompt::{PromptChannel, PromptFraming, ShellOutput};

use crate::error::config::ConfigError;
use crate::error::shell::ShellError;
use crate::session::SessionConfig;

use common::RedactedSecret;

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info, warn};
use ssh2::{Channel, Session as SshSession};
use url::Url;

const DEFAULT_SSH_PORT: u16 = 22;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_PROMPT: &str = "# ";
const DEFAULT_TERMINAL_WIDTH: u32 = 500;
const DEFAULT_TERMINAL_HEIGHT: u32 = 24;
const BLOCKING_READ_SLICE: Duration = Duration::from_millis(250);
const TERMINAL_TYPE: &str = "vt100";
const DISCONNECT_DESCRIPTION: &str = "shell bridge closed";

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: RedactedSecret,
    pub connect_timeout: Duration,
    /// Upper bound for one command's response.
    pub read_timeout: Duration,
    /// Pause between writing a command and reading its output.
    pub settle_delay: Duration,
    pub prompt: String,
    pub terminal_width: u32,
}

impl ShellConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            password: RedactedSecret::password(password),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            prompt: DEFAULT_PROMPT.to_string(),
            terminal_width: DEFAULT_TERMINAL_WIDTH,
        }
    }

    /// Shell config reusing a REST session's chassis and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the session has no credentials
    /// or its address has no host.
    pub fn for_session(config: &SessionConfig) -> Result<Self, ConfigError> {
        let credentials = config.credentials.as_ref().ok_or_else(|| {
            ConfigError::validation("Shell access needs username/password credentials")
        })?;

        let host = host_of(&config.address)?;

        Ok(Self {
            password: credentials.password.clone(),
            ..Self::new(host, credentials.username.clone(), "")
        })
    }

    pub fn framing(&self) -> PromptFraming {
        PromptFraming {
            prompt: self.prompt.clone(),
            read_timeout: self.read_timeout,
            settle_delay: self.settle_delay,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation("Shell host cannot be empty"));
        }

        if self.username.trim().is_empty() {
            return Err(ConfigError::validation("Shell username cannot be empty"));
        }

        if self.prompt.is_empty() {
            return Err(ConfigError::validation("Shell prompt marker cannot be empty"));
        }

        if self.read_timeout.is_zero() {
            return Err(ConfigError::validation("Shell read timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Host part of a chassis address, with or without scheme and port.
pub(crate) fn host_of(address: &str) -> Result<String, ConfigError> {
    let address = address.trim();

    if address.starts_with("http://") || address.starts_with("https://") {
        let url = Url::parse(address)
            .map_err(|e| ConfigError::validation(format!("Invalid chassis address '{address}': {e}")))?;
        return url
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::validation(format!("Chassis address '{address}' has no host")));
    }

    let host = address.split('/').next().unwrap_or_default();
    // `host:port`, but leave bare IPv6 literals alone.
    let host = match host.split_once(':') {
        Some((name, port)) if !port.contains(':') => name,
        _ => host,
    };
    if host.is_empty() {
        return Err(ConfigError::validation("Chassis address cannot be empty"));
    }
    Ok(host.to_string())
}

/// An open interactive shell on the chassis.
pub struct ShellBridge {
    session: SshSession,
    channel: PromptChannel<Channel>,
    host: String,
}

impl ShellBridge {
    /// Connect, authenticate with password and start a PTY shell.
    pub fn open(config: &ShellConfig) -> Result<Self, ShellError> {
        config.validate()?;

        let address = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| ShellError::connect(format!("Failed to resolve {}: {e}", config.host)))?
            .next()
            .ok_or_else(|| ShellError::connect(format!("No address found for {}", config.host)))?;

        debug!("Opening shell connection to {}@{address}", config.username);

        let tcp = TcpStream::connect_timeout(&address, config.connect_timeout)
            .map_err(|e| ShellError::connect(format!("Failed to connect to {address}: {e}")))?;

        let mut session = SshSession::new()?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| ShellError::connect(format!("SSH handshake with {address} failed: {e}")))?;

        session
            .userauth_password(&config.username, config.password.expose())
            .map_err(|e| ShellError::auth(format!("Password authentication failed: {e}")))?;

        if !session.authenticated() {
            return Err(ShellError::auth(format!(
                "Server did not accept credentials for '{}'",
                config.username
            )));
        }

        let mut channel = session.channel_session()?;
        channel.request_pty(
            TERMINAL_TYPE,
            None,
            Some((config.terminal_width, DEFAULT_TERMINAL_HEIGHT, 0, 0)),
        )?;
        channel.shell()?;

        // Reads come back as TimedOut after this slice; the prompt loop owns the real deadline.
        session.set_timeout(BLOCKING_READ_SLICE.as_millis() as u32);

        info!("Shell opened on {}", config.host);

        Ok(Self {
            session,
            channel: PromptChannel::new(channel, config.framing()),
            host: config.host.clone(),
        })
    }

    pub fn send_command(&mut self, command: &str) -> Result<ShellOutput, ShellError> {
        self.channel.send_command(command)
    }

    /// Run a mode-switching command whose own output is of no interest.
    pub fn enter(&mut self, command: &str) -> Result<(), ShellError> {
        self.channel.send_command(command).map(|_| ())
    }
}

impl Drop for ShellBridge {
    fn drop(&mut self) {
        let channel = self.channel.stream_mut();
        if let Err(e) = channel.send_eof().and_then(|_| channel.close()) {
            warn!("Failed to close shell channel on {}: {e}", self.host);
        }
        if let Err(e) = self.session.disconnect(None, DISCONNECT_DESCRIPTION, None) {
            warn!("Failed to disconnect shell session on {}: {e}", self.host);
        }
        debug!("Shell closed on {}", self.host);
    }
}
