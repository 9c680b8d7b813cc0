//! The HTTP request gateway: one attempt per call, two-outcome classification.

use crate::ControlRoomError;
use async_trait::async_trait;
use controlroom_util::http::parse_response_json_strict;
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Statuses treated as success. Anything else, including other 2xx codes, is a failure.
pub const SUCCESS_STATUSES: [u16; 2] = [200, 201];

/// Classified response of a single gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status 200 or 201 with the decoded body (`null` for an empty body).
    Success { status: u16, body: Value },
    /// Any other status with the raw response text.
    Failure { status: u16, body: String },
}

impl Reply {
    /// Classify a raw status/body pair.
    ///
    /// A success whose body is not JSON is a decode error; failure bodies are
    /// kept as raw text.
    pub fn from_parts(operation: &str, status: u16, text: String) -> Result<Self, ControlRoomError> {
        if !SUCCESS_STATUSES.contains(&status) {
            return Ok(Self::Failure { status, body: text });
        }
        if text.trim().is_empty() {
            return Ok(Self::Success { status, body: Value::Null });
        }
        let body = parse_response_json_strict(&text, StatusCode::from_u16(status).ok())
            .map_err(|error| ControlRoomError::decode(operation, error.to_string()))?;
        Ok(Self::Success { status, body })
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Collapse into the decoded body, turning a failure into [`ControlRoomError::Remote`].
    pub fn into_result(self, operation: &str) -> Result<Value, ControlRoomError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::Failure { status, body } => Err(ControlRoomError::remote(operation, status, body)),
        }
    }
}

/// Issues single requests against fully-formed URLs.
///
/// Implementations perform exactly one attempt per call and never retry.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send one request and classify the response.
    ///
    /// Only transport problems and undecodable success bodies are errors;
    /// unexpected statuses come back as [`Reply::Failure`].
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Reply, ControlRoomError>;

    /// GET `url`, failing with [`ControlRoomError::Remote`] on an unexpected status.
    async fn get(&self, url: &str) -> Result<Value, ControlRoomError> {
        let reply = self.send(Method::GET, url, None).await?;
        reply.into_result(&describe_call(&Method::GET, url))
    }

    /// POST `body` (if any) to `url`, failing with [`ControlRoomError::Remote`] on an unexpected status.
    async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value, ControlRoomError> {
        let reply = self.send(Method::POST, url, body).await?;
        reply.into_result(&describe_call(&Method::POST, url))
    }
}

/// Label used in errors and logs to identify a call.
pub fn describe_call(method: &Method, url: &str) -> String {
    format!("{method} {url}")
}
