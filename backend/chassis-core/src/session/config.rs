use crate::error::config::ConfigError;

use common::RedactedSecret;

use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Username/password pair kept so the session can re-authenticate.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: RedactedSecret,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: RedactedSecret::password(password),
        }
    }
}

/// Everything a [`crate::Session`] needs, supplied at construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Chassis host, or a full origin such as `http://127.0.0.1:8443`.
    pub address: String,
    pub credentials: Option<Credentials>,
    /// Pre-obtained API key; skips authentication at connect time.
    pub api_key: Option<RedactedSecret>,
    /// Wall-clock limit for one async poll loop.
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Limit for a single HTTP exchange, independent of `timeout`.
    pub request_timeout: Duration,
    /// Log every request and response at info level.
    pub verbose: bool,
    /// Chassis ship self-signed certificates.
    pub accept_invalid_certs: bool,
    /// Warn on every request sent without certificate verification.
    pub insecure_request_warning: bool,
}

impl SessionConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            credentials: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            verbose: false,
            accept_invalid_certs: true,
            insecure_request_warning: false,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(RedactedSecret::api_key(api_key));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_insecure_request_warning(mut self, warn: bool) -> Self {
        self.insecure_request_warning = warn;
        self
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::validation("Chassis address cannot be empty"));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::validation("Poll interval must be greater than zero"));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::validation("Request timeout must be greater than zero"));
        }

        if self.poll_interval > self.timeout {
            return Err(ConfigError::validation(format!(
                "Poll interval {:?} exceeds async timeout {:?}",
                self.poll_interval, self.timeout
            )));
        }

        if let Some(credentials) = &self.credentials {
            if credentials.username.trim().is_empty() {
                return Err(ConfigError::validation("Username cannot be empty"));
            }
        }

        Ok(())
    }
}
