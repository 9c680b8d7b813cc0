//! Typed inputs for each Control Room operation.
//!
//! Doc comments double as JSON Schema descriptions, so they are written for
//! whoever fills the inputs in.

use crate::filters::{ProcessRunState, WorkItemState};
use crate::work_item::WorkItemUpdate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const DEFAULT_PROCESS_RUN_LIMIT: u32 = 10;

fn default_process_run_limit() -> Option<u32> {
    Some(DEFAULT_PROCESS_RUN_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListProcessRunsInput {
    /// ID of the process whose runs are listed.
    pub process_id: String,
    /// Maximum number of runs to return. Defaults to 10.
    #[serde(default = "default_process_run_limit")]
    pub limit: Option<u32>,
    /// Optional state filter: 'new', 'in_progress', 'completed', 'unresolved' or 'stopping'.
    /// Any other value is ignored.
    #[serde(default)]
    pub state: Option<String>,
}

impl ListProcessRunsInput {
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            limit: default_process_run_limit(),
            state: None,
        }
    }

    pub fn state_filter(&self) -> Option<ProcessRunState> {
        ProcessRunState::from_filter(self.state.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListStepRunsInput {
    /// ID of the process run.
    pub process_run_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListStepRunArtifactsInput {
    /// ID of the step run.
    pub step_run_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GetStepRunArtifactInput {
    /// ID of the step run.
    pub step_run_id: String,
    /// ID of the artifact.
    pub artifact_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GetAssetInput {
    /// ID of the asset.
    pub asset_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StartProcessRunInput {
    /// ID of the process to start.
    pub process_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListWorkItemsInput {
    /// ID of the process owning the work items.
    pub process_id: String,
    /// ID of the process run owning the work items.
    pub process_run_id: String,
    /// Optional state filter: 'new', 'pending', 'in_progress', 'failed' or 'done'.
    /// Any other value is ignored.
    #[serde(default)]
    pub state: Option<String>,
}

impl ListWorkItemsInput {
    pub fn state_filter(&self) -> Option<WorkItemState> {
        WorkItemState::from_filter(self.state.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GetWorkItemsInput {
    /// Work item IDs to fetch, in the order results should be returned.
    pub work_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateWorkItemPayloadInput {
    /// Payload replacements. Entries without an ID or with an empty payload are skipped.
    pub work_item_updates: Vec<WorkItemUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RetryWorkItemsInput {
    /// Work item IDs to retry in a single batch operation.
    pub work_item_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn process_run_limit_defaults_to_ten() {
        let input: ListProcessRunsInput = serde_json::from_value(json!({ "process_id": "p-1" })).unwrap();
        assert_eq!(input.limit, Some(10));
        assert_eq!(input.state_filter(), None);
    }

    #[test]
    fn explicit_null_limit_disables_the_limit() {
        let input: ListProcessRunsInput = serde_json::from_value(json!({ "process_id": "p-1", "limit": null })).unwrap();
        assert_eq!(input.limit, None);
    }

    #[test]
    fn work_item_state_filter_ignores_unknown_values() {
        let input: ListWorkItemsInput = serde_json::from_value(json!({
            "process_id": "p-1",
            "process_run_id": "r-1",
            "state": "exploded"
        }))
        .unwrap();
        assert_eq!(input.state_filter(), None);
    }

    #[test]
    fn update_input_rejects_malformed_payload_at_construction() {
        let result = serde_json::from_value::<UpdateWorkItemPayloadInput>(json!({
            "work_item_updates": [
                { "work_item_id": "wi-1", "payload": "{\"ok\": true}" },
                { "work_item_id": "wi-2", "payload": "{broken" }
            ]
        }));
        assert!(result.is_err());
    }
}
