use crate::async_op::AsyncOutcome;
use crate::error::session::SessionError;
use crate::transport::Response;

use reqwest::Method;
use serde_json::Value;

/// One call against the chassis. Built per call, never retained.
#[derive(Debug, Clone)]
pub struct ChassisRequest {
    pub method: Method,
    /// Absolute URL, or a path relative to the IxOS API root.
    pub target: String,
    pub payload: Option<Value>,
    pub params: Vec<(String, String)>,
}

impl ChassisRequest {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            payload: None,
            params: Vec::new(),
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    pub fn put(target: impl Into<String>) -> Self {
        Self::new(Method::PUT, target)
    }

    pub fn patch(target: impl Into<String>) -> Self {
        Self::new(Method::PATCH, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target)
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// What a request resolves to.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Any non-4xx, non-202 status, body attached.
    Response(Response),
    /// The request answered 202 and polling reached a terminal state.
    Async(AsyncOutcome),
}

impl Reply {
    pub fn is_async(&self) -> bool {
        matches!(self, Reply::Async(_))
    }

    /// Parsed body of a plain response.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Reply::Response(response) => response.body(),
            Reply::Async(_) => None,
        }
    }

    #[track_caller]
    pub fn into_response(self) -> Result<Response, SessionError> {
        match self {
            Reply::Response(response) => Ok(response),
            Reply::Async(outcome) => Err(SessionError::protocol(format!(
                "expected a direct response but the chassis ran an async operation ({outcome:?})"
            ))),
        }
    }

    #[track_caller]
    pub fn into_outcome(self) -> Result<AsyncOutcome, SessionError> {
        match self {
            Reply::Async(outcome) => Ok(outcome),
            Reply::Response(response) => Err(SessionError::protocol(format!(
                "expected an async operation but the chassis answered {} directly",
                response.status
            ))),
        }
    }
}
