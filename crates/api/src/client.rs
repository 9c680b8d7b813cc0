use crate::gateway::{Gateway, Reply, describe_call};
use crate::{ControlRoomConfig, ControlRoomError};
use async_trait::async_trait;
use controlroom_util::{redact_sensitive, truncate_for_summary};
use reqwest::{Client, Method, RequestBuilder, header};
use serde_json::{Map, Value};
use std::env;
use std::time::Instant;
use tracing::{debug, warn};

const LOGGED_BODY_CHARS: usize = 200;

/// Thin wrapper around a configured `reqwest::Client` for Control Room access.
///
/// Every request carries the same fixed header set: JSON content type, the
/// workspace API key as `Authorization`, and a User-Agent. Transport defaults
/// apply; no timeout override and no retries.
#[derive(Debug, Clone)]
pub struct ControlRoomClient {
    config: ControlRoomConfig,
    http: Client,
    user_agent: String,
}

impl ControlRoomClient {
    pub fn new(config: ControlRoomConfig) -> Result<Self, ControlRoomError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        let mut authorization = header::HeaderValue::from_str(config.api_key())
            .map_err(|error| ControlRoomError::config(format!("API key is not a valid header value: {error}")))?;
        authorization.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, authorization);

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|error| ControlRoomError::config(format!("build http client: {error}")))?;

        Ok(Self {
            config,
            http,
            user_agent: format!("controlroom/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Construct a client from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ControlRoomError> {
        Self::new(ControlRoomConfig::from_env()?)
    }

    pub fn config(&self) -> &ControlRoomConfig {
        &self.config
    }

    /// Build a `reqwest::RequestBuilder` for a method and absolute URL.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(url = %url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Describe the request that `send` would issue, with secrets redacted.
    pub fn preview_request(&self, method: &Method, url: &str, body: Option<&Value>) -> Value {
        let mut headers = Map::new();
        headers.insert(header::CONTENT_TYPE.to_string(), Value::String("application/json".into()));
        let authorization_line = redact_sensitive(&format!("authorization: {}", self.config.api_key()));
        let authorization = authorization_line
            .split_once(':')
            .map(|(_, value)| value.trim().to_string())
            .unwrap_or_default();
        headers.insert(header::AUTHORIZATION.to_string(), Value::String(authorization));
        headers.insert(header::USER_AGENT.to_string(), Value::String(self.user_agent.clone()));

        serde_json::json!({
            "method": method.as_str(),
            "url": url,
            "headers": headers,
            "body": body,
        })
    }
}

#[async_trait]
impl Gateway for ControlRoomClient {
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Reply, ControlRoomError> {
        let start = Instant::now();
        let operation = describe_call(&method, url);
        debug!(method = %method, url = %url, has_body = body.is_some(), "http request started");

        let mut request_builder = self.request(method.clone(), url);
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        let response = request_builder.send().await.map_err(|error| {
            let message = redact_sensitive(&error.to_string());
            warn!(
                method = %method,
                url = %url,
                error = %message,
                duration_ms = start.elapsed().as_millis(),
                "http request failed to send"
            );
            ControlRoomError::transport(&operation, message)
        })?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|error| ControlRoomError::transport(&operation, redact_sensitive(&error.to_string())))?;

        let reply = Reply::from_parts(&operation, status, text)?;
        if reply.is_success() {
            debug!(
                method = %method,
                url = %url,
                status,
                duration_ms = start.elapsed().as_millis(),
                "http request completed"
            );
        } else if let Reply::Failure { body, .. } = &reply {
            warn!(
                method = %method,
                url = %url,
                status,
                body = %redact_sensitive(&truncate_for_summary(body, LOGGED_BODY_CHARS)),
                duration_ms = start.elapsed().as_millis(),
                "http request returned unexpected status"
            );
        }
        Ok(reply)
    }
}
