//! Client configuration resolved once at startup.

use crate::ControlRoomError;
use reqwest::Url;
use std::{env, fmt};

/// Default root of the workspace-scoped REST API.
pub const DEFAULT_API_BASE: &str = "https://cloud.robocorp.com/api/v1/workspaces";

pub const API_BASE_ENV: &str = "CONTROL_ROOM_API_BASE";
pub const WORKSPACE_ID_ENV: &str = "WORKSPACE_ID";
pub const API_KEY_ENV: &str = "API_KEY";
pub const ORGANIZATION_ID_ENV: &str = "ORGANIZATION_ID";

/// Hostnames allowed to use plain HTTP for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Read-only connection settings for one Control Room workspace.
///
/// Every request is scoped under `{base_url}/{workspace_id}` and carries
/// `api_key` verbatim in the `Authorization` header.
#[derive(Clone)]
pub struct ControlRoomConfig {
    base_url: String,
    workspace_id: String,
    api_key: String,
    organization_id: Option<String>,
}

impl ControlRoomConfig {
    /// Build a validated configuration.
    ///
    /// Trailing slashes on `base_url` are dropped. Workspace id and API key
    /// must be non-blank.
    pub fn new(base_url: impl Into<String>, workspace_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ControlRoomError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let workspace_id = workspace_id.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        validate_base_url(&base_url)?;
        if workspace_id.is_empty() {
            return Err(ControlRoomError::config(format!("{WORKSPACE_ID_ENV} must not be empty")));
        }
        if api_key.is_empty() {
            return Err(ControlRoomError::config(format!("{API_KEY_ENV} must not be empty")));
        }

        Ok(Self {
            base_url,
            workspace_id,
            api_key,
            organization_id: None,
        })
    }

    /// Load configuration from a `.env` file (when present) and the process environment.
    pub fn from_env() -> Result<Self, ControlRoomError> {
        let _ = dotenvy::dotenv();
        Self::from_process_env()
    }

    /// Resolve configuration from the process environment only.
    ///
    /// - `CONTROL_ROOM_API_BASE` (optional, defaults to [`DEFAULT_API_BASE`])
    /// - `WORKSPACE_ID` (required)
    /// - `API_KEY` (required)
    /// - `ORGANIZATION_ID` (optional)
    pub fn from_process_env() -> Result<Self, ControlRoomError> {
        let base_url = env::var(API_BASE_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let workspace_id = env::var(WORKSPACE_ID_ENV).map_err(|_| ControlRoomError::config(format!("{WORKSPACE_ID_ENV} is not set")))?;
        let api_key = env::var(API_KEY_ENV).map_err(|_| ControlRoomError::config(format!("{API_KEY_ENV} is not set")))?;
        let organization_id = env::var(ORGANIZATION_ID_ENV).ok().filter(|value| !value.trim().is_empty());

        Ok(Self::new(base_url, workspace_id, api_key)?.with_organization_id(organization_id))
    }

    pub fn with_organization_id(mut self, organization_id: Option<String>) -> Self {
        self.organization_id = organization_id;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    /// Root URL every workspace-scoped path hangs off.
    pub fn workspace_url(&self) -> String {
        format!("{}/{}", self.base_url, self.workspace_id)
    }
}

impl fmt::Debug for ControlRoomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlRoomConfig")
            .field("base_url", &self.base_url)
            .field("workspace_id", &self.workspace_id)
            .field("api_key", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), ControlRoomError> {
    let parsed_base_url =
        Url::parse(base).map_err(|e| ControlRoomError::config(format!("invalid {API_BASE_ENV} URL '{}': {}", base, e)))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| ControlRoomError::config(format!("{API_BASE_ENV} must include a host")))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(ControlRoomError::config(format!(
            "{API_BASE_ENV} must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    Ok(())
}
