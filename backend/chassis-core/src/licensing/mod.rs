//! Licensing endpoints under `/platform/api/v2/licensing`.
//!
//! Thin callers of [`Session::request`]: each builds a URL and payload and
//! hands back the chassis' JSON. Operations that run asynchronously are
//! followed to their result URL.

use crate::async_op::AsyncOutcome;
use crate::error::session::SessionError;
use crate::session::{ChassisRequest, Reply, Session};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const SERVERS: &str = "/servers";
const TEST_CONNECTIVITY_OPERATION: &str = "testbackendconnectivity";
const ACTIVATION_CODE_INFO_OPERATION: &str = "retrieveactivationcodeinfo";
const ACTIVATE_OPERATION: &str = "activate";
const DEACTIVATE_OPERATION: &str = "deactivate";
const RETRIEVE_LICENSES_OPERATION: &str = "retrievelicenses";
/// Where chassis that answer retrieve-licenses synchronously keep the result.
const RETRIEVE_LICENSES_FALLBACK_RESULT: &str = "1/result";

/// One activation code and how many seats to (de)activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationCodeQuantity {
    pub activation_code: String,
    pub quantity: u32,
}

impl ActivationCodeQuantity {
    pub fn new(activation_code: impl Into<String>, quantity: u32) -> Self {
        Self {
            activation_code: activation_code.into(),
            quantity,
        }
    }
}

pub struct Licensing<'a> {
    session: &'a Session,
}

impl<'a> Licensing<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn servers(&self) -> Result<Value, SessionError> {
        let url = self.session.endpoint().licensing_url(SERVERS)?;
        let reply = self.session.request(ChassisRequest::get(url.as_str())).await?;
        Ok(body_or_null(&reply))
    }

    pub async fn add_server(&self, host: &str) -> Result<Value, SessionError> {
        let url = self.session.endpoint().licensing_url(SERVERS)?;
        let request = ChassisRequest::post(url.as_str()).with_payload(json!({
            "host": host,
            "isActive": true,
        }));
        let reply = self.session.request(request).await?;
        self.follow(reply).await
    }

    pub async fn remove_server(&self, id: u32) -> Result<Value, SessionError> {
        let url = self
            .session
            .endpoint()
            .licensing_url(&format!("{SERVERS}/{id}"))?;
        let reply = self
            .session
            .request(ChassisRequest::delete(url.as_str()))
            .await?;
        self.follow(reply).await
    }

    /// Ask the license server to check it can reach the licensing backend.
    pub async fn test_connectivity(&self, id: u32) -> Result<Value, SessionError> {
        self.operation(id, TEST_CONNECTIVITY_OPERATION, None).await
    }

    pub async fn activation_code_info(
        &self,
        id: u32,
        activation_code: &str,
    ) -> Result<Value, SessionError> {
        let payload = json!({ "activationCode": activation_code });
        self.operation(id, ACTIVATION_CODE_INFO_OPERATION, Some(payload))
            .await
    }

    pub async fn activate(
        &self,
        id: u32,
        codes: &[ActivationCodeQuantity],
    ) -> Result<Value, SessionError> {
        let payload = serde_json::to_value(codes)?;
        self.operation(id, ACTIVATE_OPERATION, Some(payload)).await
    }

    pub async fn deactivate(
        &self,
        id: u32,
        codes: &[ActivationCodeQuantity],
    ) -> Result<Value, SessionError> {
        let payload = serde_json::to_value(codes)?;
        self.operation(id, DEACTIVATE_OPERATION, Some(payload)).await
    }

    /// Licenses installed on a license server.
    ///
    /// Some chassis answer the retrieve operation with a plain 200 instead
    /// of a 202; those keep the result at a fixed location.
    pub async fn retrieve_licenses(&self, id: u32) -> Result<Value, SessionError> {
        let target = self.operation_path(id, RETRIEVE_LICENSES_OPERATION);
        let url = self.session.endpoint().licensing_url(&target)?;
        let reply = self
            .session
            .request(ChassisRequest::post(url.as_str()))
            .await?;

        match reply {
            Reply::Async(outcome) => self.fetch_result(outcome).await,
            Reply::Response(_) => {
                let fallback = self.session.endpoint().licensing_url(&format!(
                    "{target}/{RETRIEVE_LICENSES_FALLBACK_RESULT}"
                ))?;
                debug!("Retrieve licenses answered synchronously; reading {fallback}");
                self.get_body(fallback.as_str()).await
            }
        }
    }

    async fn operation(
        &self,
        id: u32,
        operation: &str,
        payload: Option<Value>,
    ) -> Result<Value, SessionError> {
        let url = self
            .session
            .endpoint()
            .licensing_url(&self.operation_path(id, operation))?;

        let mut request = ChassisRequest::post(url.as_str());
        request.payload = payload;

        let reply = self.session.request(request).await?;
        self.follow(reply).await
    }

    fn operation_path(&self, id: u32, operation: &str) -> String {
        format!("{SERVERS}/{id}/operations/{operation}")
    }

    /// Body of a direct reply, or the result document of an async one.
    pub async fn follow(&self, reply: Reply) -> Result<Value, SessionError> {
        match reply {
            Reply::Response(response) => Ok(response.body.unwrap_or(Value::Null)),
            Reply::Async(outcome) => self.fetch_result(outcome).await,
        }
    }

    async fn fetch_result(&self, outcome: AsyncOutcome) -> Result<Value, SessionError> {
        match outcome {
            AsyncOutcome::Completed { result_url } => self.get_body(&result_url).await,
            AsyncOutcome::Failed { message } => Err(SessionError::operation_failed(message)),
        }
    }

    async fn get_body(&self, target: &str) -> Result<Value, SessionError> {
        let response = self.session.get(target).await?.into_response()?;
        Ok(response.body.unwrap_or(Value::Null))
    }
}

fn body_or_null(reply: &Reply) -> Value {
    reply.body().cloned().unwrap_or(Value::Null)
}
