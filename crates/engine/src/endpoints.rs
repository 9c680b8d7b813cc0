//! Workspace-scoped URL construction.
//!
//! Path identifiers are interpolated verbatim; query values are form-encoded.
//! Required identifiers must be non-blank, and a blank one is rejected before
//! any request is built.

use controlroom_api::ControlRoomError;
use controlroom_types::{ProcessRunState, WorkItemState};
use indexmap::IndexMap;
use url::Url;

/// Step-run listings are always requested one entry at a time.
const STEP_RUN_PAGE_SIZE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    workspace_url: String,
}

impl Endpoints {
    pub fn new(workspace_url: impl Into<String>) -> Self {
        Self {
            workspace_url: workspace_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn workspace_url(&self) -> &str {
        &self.workspace_url
    }

    pub fn processes(&self) -> String {
        self.path("processes")
    }

    pub fn process_runs(&self, process_id: &str, limit: Option<u32>, state: Option<ProcessRunState>) -> Result<String, ControlRoomError> {
        let mut query = IndexMap::new();
        query.insert("process_id", require("process_id", process_id)?.to_string());
        if let Some(limit) = limit {
            query.insert("limit", limit.to_string());
        }
        if let Some(state) = state {
            query.insert("state", state.as_str().to_string());
        }
        with_query(self.path("process-runs"), &query)
    }

    pub fn step_runs(&self, process_run_id: &str) -> Result<String, ControlRoomError> {
        let mut query = IndexMap::new();
        query.insert("process_run_id", require("process_run_id", process_run_id)?.to_string());
        query.insert("limit", STEP_RUN_PAGE_SIZE.to_string());
        with_query(self.path("step-runs"), &query)
    }

    pub fn step_run_artifacts(&self, step_run_id: &str) -> Result<String, ControlRoomError> {
        let step_run_id = require("step_run_id", step_run_id)?;
        Ok(self.path(&format!("step-runs/{step_run_id}/artifacts")))
    }

    pub fn step_run_artifact(&self, step_run_id: &str, artifact_id: &str) -> Result<String, ControlRoomError> {
        let step_run_id = require("step_run_id", step_run_id)?;
        let artifact_id = require("artifact_id", artifact_id)?;
        Ok(self.path(&format!("step-runs/{step_run_id}/artifacts/{artifact_id}")))
    }

    pub fn workers(&self) -> String {
        self.path("workers")
    }

    pub fn assets(&self) -> String {
        self.path("assets")
    }

    pub fn asset(&self, asset_id: &str) -> Result<String, ControlRoomError> {
        let asset_id = require("asset_id", asset_id)?;
        Ok(self.path(&format!("assets/{asset_id}")))
    }

    pub fn start_process_run(&self, process_id: &str) -> Result<String, ControlRoomError> {
        let process_id = require("process_id", process_id)?;
        Ok(self.path(&format!("processes/{process_id}/process-runs")))
    }

    pub fn work_items(&self, process_id: &str, process_run_id: &str, state: Option<WorkItemState>) -> Result<String, ControlRoomError> {
        let mut query = IndexMap::new();
        query.insert("process_id", require("process_id", process_id)?.to_string());
        query.insert("process_run_id", require("process_run_id", process_run_id)?.to_string());
        if let Some(state) = state {
            query.insert("state", state.as_str().to_string());
        }
        with_query(self.path("work-items"), &query)
    }

    pub fn work_item(&self, work_item_id: &str) -> Result<String, ControlRoomError> {
        let work_item_id = require("work_item_id", work_item_id)?;
        Ok(self.path(&format!("work-items/{work_item_id}")))
    }

    pub fn work_item_payload(&self, work_item_id: &str) -> Result<String, ControlRoomError> {
        let work_item_id = require("work_item_id", work_item_id)?;
        Ok(self.path(&format!("work-items/{work_item_id}/payload")))
    }

    pub fn work_items_batch(&self) -> String {
        self.path("work-items/batch")
    }

    fn path(&self, relative: &str) -> String {
        format!("{}/{}", self.workspace_url, relative)
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ControlRoomError> {
    if value.trim().is_empty() {
        return Err(ControlRoomError::invalid_input(field, "must not be empty"));
    }
    Ok(value)
}

fn with_query(base: String, query: &IndexMap<&str, String>) -> Result<String, ControlRoomError> {
    let mut url = Url::parse(&base).map_err(|error| ControlRoomError::config(format!("invalid endpoint URL '{base}': {error}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.into())
}
