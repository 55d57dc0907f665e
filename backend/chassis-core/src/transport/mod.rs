//! Single-shot HTTP exchange with the chassis.
//!
//! The transport owns no session state: it receives a fully resolved URL,
//! the headers and an already serialized body, and hands back the status,
//! reason phrase and (maybe) parsed JSON. Classification of the status code
//! is the session's job.

use crate::JSON_CONTENT_TYPE;
use crate::error::session::SessionError;

use common::HttpStatusCode;

use std::time::Duration;

use log::{trace, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::{Map, Value};
use url::Url;

/// Fully prepared request handed to the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
    pub params: Vec<(String, String)>,
}

/// Response from the chassis with the body parsed when it is JSON.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: HttpStatusCode,
    /// Standard reason phrase for `status` (`"Unauthorized"` for 401).
    ///
    /// reqwest drops the phrase the server actually sent, so this is the
    /// canonical one, or empty for codes without a registered phrase.
    pub reason: String,
    pub url: Url,
    /// Parsed JSON body, `None` when the body is empty or not JSON.
    pub body: Option<Value>,
    /// Raw body text, kept for error reporting.
    pub text: String,
}

impl Response {
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// String field from a JSON object body.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get(key))
            .and_then(Value::as_str)
    }

    /// Body rendered for error messages: JSON if parsed, raw text otherwise.
    pub fn body_for_display(&self) -> String {
        match &self.body {
            Some(body) => body.to_string(),
            None if self.text.is_empty() => String::from("null"),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with a per-call timeout.
    ///
    /// `accept_invalid_certs` mirrors the chassis' self-signed certificates;
    /// it is on by default in [`crate::SessionConfig`].
    pub fn new(request_timeout: Duration, accept_invalid_certs: bool) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }

    /// Send one request. Connection failures and timeouts surface as
    /// [`SessionError::Transport`]; they are never retried here.
    pub async fn send(&self, request: TransportRequest) -> Result<Response, SessionError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = HttpStatusCode(response.status().as_u16());
        let reason = response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string();
        let url = response.url().clone();
        let bytes = response.bytes().await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        trace!("{} {} -> {} ({} bytes)", request.method, url, status, bytes.len());

        Ok(Response {
            status,
            reason,
            url,
            body: parse_body(&text),
            text,
        })
    }
}

/// Parse a response body, tolerating empty and non-JSON payloads.
pub(crate) fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Invalid/Non-JSON payload received: {text}");
            None
        }
    }
}

/// Serialize a payload with keys sorted at every depth and two-space indentation.
pub(crate) fn canonical_json(payload: &Value) -> Result<String, SessionError> {
    Ok(serde_json::to_string_pretty(&sort_keys(payload))?)
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key.clone(), sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
