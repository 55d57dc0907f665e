//! Authenticated session against one chassis.
//!
//! A [`Session`] owns the chassis endpoint, the API key and the transport.
//! Every call goes through [`Session::request`], which resolves the target,
//! attaches the key, classifies the status code and, for `202 Accepted`,
//! hands off to the [`AsyncOperationPoller`].
//!
//! # Token handling
//!
//! The key sits behind an `RwLock`: requests take a read guard just long
//! enough to copy the header value, re-authentication swaps it under the
//! write guard. Concurrent refreshes are serialized by a separate mutex so
//! two logins never interleave.

pub mod config;
pub mod endpoint;
pub mod request;

pub use config::{Credentials, SessionConfig};
pub use endpoint::ChassisEndpoint;
pub use request::{ChassisRequest, Reply};

use crate::API_KEY_HEADER;
use crate::async_op::{AsyncOperationDescriptor, AsyncOperationPoller};
use crate::error::config::ConfigError;
use crate::error::session::SessionError;
use crate::translator::check_status;
use crate::transport::{HttpTransport, Response, TransportRequest, canonical_json};

use common::RedactedSecret;

use log::{Level, debug, info, log, warn};
use serde_json::{Value, json};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

const API_KEY_FIELD: &str = "apiKey";

pub struct Session {
    config: SessionConfig,
    endpoint: ChassisEndpoint,
    transport: HttpTransport,
    api_key: RwLock<Option<RedactedSecret>>,
    auth_lock: Mutex<()>,
}

impl Session {
    /// Build a session without touching the network.
    ///
    /// Uses the configured API key if there is one. Call [`Session::connect`]
    /// to also log in with the configured credentials.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let endpoint = ChassisEndpoint::new(&config.address)?;
        let transport = HttpTransport::new(config.request_timeout, config.accept_invalid_certs)?;
        let api_key = config.api_key.clone();

        Ok(Self {
            config,
            endpoint,
            transport,
            api_key: RwLock::new(api_key),
            auth_lock: Mutex::new(()),
        })
    }

    /// Build a session and authenticate when no API key was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the config is invalid or the login fails.
    pub async fn connect(config: SessionConfig) -> Result<Self, SessionError> {
        let session = Self::new(config)?;

        if session.config.api_key.is_some() {
            debug!("Using pre-obtained API key for {}", session.endpoint.origin());
            return Ok(session);
        }

        match session.config.credentials.clone() {
            Some(credentials) => {
                session
                    .authenticate(&credentials.username, credentials.password.expose())
                    .await?;
            }
            None => {
                warn!(
                    "No API key or credentials for {}; requests will be sent unauthenticated",
                    session.endpoint.origin()
                );
            }
        }

        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &ChassisEndpoint {
        &self.endpoint
    }

    /// Current API key, if the session has one.
    pub async fn api_key(&self) -> Option<RedactedSecret> {
        self.api_key.read().await.clone()
    }

    /// Obtain a fresh API key and make it the one every later request uses.
    ///
    /// Safe to call repeatedly to refresh an expired key.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Client`] when the chassis rejects the credentials
    /// - [`SessionError::Protocol`] when the reply carries no `apiKey`
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RedactedSecret, SessionError> {
        let _guard = self.auth_lock.lock().await;

        let payload = json!({
            "username": username,
            "password": password,
            "rememberMe": false,
            "resetWeakPassword": false,
        });

        let auth_url = self.endpoint.auth_url()?;
        let request = ChassisRequest::post(auth_url.as_str()).with_payload(payload);

        let response = self.request(request).await?.into_response()?;

        let api_key = response
            .str_field(API_KEY_FIELD)
            .map(RedactedSecret::api_key)
            .ok_or_else(|| {
                SessionError::protocol(format!(
                    "authentication reply from {auth_url} has no '{API_KEY_FIELD}'"
                ))
            })?;

        *self.api_key.write().await = Some(api_key.clone());
        info!(
            "Authenticated as '{username}' on {} ({} char API key)",
            self.endpoint.origin(),
            api_key.len()
        );

        Ok(api_key)
    }

    /// Re-authenticate with the credentials given at construction.
    pub async fn refresh(&self) -> Result<RedactedSecret, SessionError> {
        let credentials = self.config.credentials.clone().ok_or_else(|| {
            ConfigError::validation(
                "Cannot refresh the API key: session was built without credentials",
            )
        })?;

        self.authenticate(&credentials.username, credentials.password.expose())
            .await
    }

    /// Issue a request; the async timeout is the only bound on polling.
    pub async fn request(&self, request: ChassisRequest) -> Result<Reply, SessionError> {
        self.request_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// Issue a request whose async polling stops when `cancel` fires.
    ///
    /// # Returns
    ///
    /// * `Reply::Response` - any status other than 4xx and 202
    /// * `Reply::Async` - a 202 polled to a terminal state
    ///
    /// # Errors
    ///
    /// - [`SessionError::Client`] for 4xx (401 outside auth carries a re-auth hint)
    /// - [`SessionError::Transport`] when the exchange itself fails
    /// - polling errors, see [`AsyncOperationPoller::wait`]
    pub async fn request_with_cancellation(
        &self,
        request: ChassisRequest,
        cancel: &CancellationToken,
    ) -> Result<Reply, SessionError> {
        let response = self.dispatch(&request).await?;

        if response.status.is_accepted() {
            let descriptor = AsyncOperationDescriptor::from_accepted(response.body())?;
            let outcome = AsyncOperationPoller::new(self)
                .wait(descriptor, cancel)
                .await?;
            return Ok(Reply::Async(outcome));
        }

        Ok(Reply::Response(response))
    }

    pub async fn get(&self, target: &str) -> Result<Reply, SessionError> {
        self.request(ChassisRequest::get(target)).await
    }

    pub async fn post(&self, target: &str, payload: Option<Value>) -> Result<Reply, SessionError> {
        let mut request = ChassisRequest::post(target);
        request.payload = payload;
        self.request(request).await
    }

    pub async fn delete(&self, target: &str) -> Result<Reply, SessionError> {
        self.request(ChassisRequest::delete(target)).await
    }

    /// One exchange with 4xx translated to errors. 202 is returned as-is.
    pub(crate) async fn dispatch(&self, request: &ChassisRequest) -> Result<Response, SessionError> {
        let url = self.endpoint.resolve(&request.target)?;
        let body = request.payload.as_ref().map(canonical_json).transpose()?;

        let mut headers = Vec::new();
        if let Some(api_key) = self.api_key.read().await.as_ref() {
            headers.push((API_KEY_HEADER, api_key.expose().to_string()));
        }

        // Auth bodies carry the password on the way out and the key on the way back.
        let is_auth = ChassisEndpoint::is_auth_url(&url);
        let level = self.log_level();
        log!(level, "Request => {} {}", request.method, url);
        if let Some(body) = body.as_ref().filter(|_| !is_auth) {
            log!(level, "Request body => {body}");
        }

        if self.config.accept_invalid_certs
            && self.config.insecure_request_warning
            && url.scheme() == "https"
        {
            warn!(
                "Unverified HTTPS request is being made to host '{}'",
                url.host_str().unwrap_or_default()
            );
        }

        let response = self
            .transport
            .send(TransportRequest {
                method: request.method.clone(),
                url,
                headers,
                body,
                params: request.params.clone(),
            })
            .await?;

        log!(level, "Response => Status {} {}", response.status, response.reason);
        if !is_auth && !response.text.is_empty() {
            log!(level, "Response body => {}", response.text);
        }

        check_status(&response)?;

        Ok(response)
    }

    fn log_level(&self) -> Level {
        if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }
}
