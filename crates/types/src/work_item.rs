//! Work-item documents: projected details, payload updates and batch outcomes.

mod payload;

pub use payload::{PayloadError, decode_payload};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Projection of a remote work item onto the fields callers act on.
///
/// Missing fields are reported as JSON `null`; any other field of the remote
/// record (state, timestamps, ...) is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkItemDetail {
    pub id: Value,
    pub exception: Value,
    pub payload: Value,
}

impl WorkItemDetail {
    pub fn project(record: &Value) -> Self {
        let field = |name: &str| record.get(name).cloned().unwrap_or(Value::Null);
        Self {
            id: field("id"),
            exception: field("exception"),
            payload: field("payload"),
        }
    }
}

/// A requested payload replacement for one work item.
///
/// The payload may be supplied as a JSON object or as a string holding a
/// JSON-encoded object. Strings are decoded while the request is
/// deserialized, so a malformed document is rejected up front rather than
/// when the update is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkItemUpdate {
    /// Identifier of the work item to update.
    #[serde(default)]
    pub work_item_id: String,
    /// Replacement payload document.
    #[serde(default, deserialize_with = "payload::deserialize_payload")]
    #[schemars(with = "Option<Value>")]
    pub payload: Option<Map<String, Value>>,
}

impl WorkItemUpdate {
    pub fn new(work_item_id: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            work_item_id: work_item_id.into(),
            payload: Some(payload),
        }
    }

    /// Whether this update names a work item and carries a non-empty payload.
    ///
    /// Updates that are not actionable are skipped by batch execution and
    /// produce no outcome.
    pub fn is_actionable(&self) -> bool {
        !self.work_item_id.trim().is_empty() && self.payload.as_ref().is_some_and(|payload| !payload.is_empty())
    }
}

/// Result of one payload mutation within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MutationOutcome {
    pub work_item_id: String,
    #[serde(flatten)]
    pub result: MutationResult,
}

/// Success carries the decoded response body; failure carries the raw error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationResult {
    Success { response: Value },
    Failure { error: String },
}

impl MutationOutcome {
    pub fn success(work_item_id: impl Into<String>, response: Value) -> Self {
        Self {
            work_item_id: work_item_id.into(),
            result: MutationResult::Success { response },
        }
    }

    pub fn failure(work_item_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            work_item_id: work_item_id.into(),
            result: MutationResult::Failure { error: error.into() },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, MutationResult::Success { .. })
    }
}

/// Per-item outcomes of a payload update batch, shaped as `{ "updates": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PayloadUpdates {
    pub updates: Vec<MutationOutcome>,
}

impl PayloadUpdates {
    pub fn succeeded(&self) -> usize {
        self.updates.iter().filter(|outcome| outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.updates.len() - self.succeeded()
    }
}

/// Body of a multi-item batch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchOperation {
    pub batch_operation: String,
    pub work_item_ids: Vec<String>,
}

impl BatchOperation {
    pub fn retry(work_item_ids: Vec<String>) -> Self {
        Self {
            batch_operation: "retry".to_string(),
            work_item_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_keeps_only_id_exception_and_payload() {
        let record = json!({
            "id": "wi-1",
            "state": "failed",
            "created_at": "2024-05-01T00:00:00Z",
            "exception": { "type": "business", "message": "bad invoice" },
            "payload": { "invoice": 42 }
        });

        let detail = WorkItemDetail::project(&record);

        assert_eq!(
            serde_json::to_value(&detail).unwrap(),
            json!({
                "id": "wi-1",
                "exception": { "type": "business", "message": "bad invoice" },
                "payload": { "invoice": 42 }
            })
        );
    }

    #[test]
    fn project_defaults_missing_fields_to_null() {
        let detail = WorkItemDetail::project(&json!({ "id": "wi-2" }));
        assert_eq!(detail.exception, Value::Null);
        assert_eq!(detail.payload, Value::Null);
    }

    #[test]
    fn update_accepts_object_or_encoded_payload() {
        let from_object: WorkItemUpdate = serde_json::from_value(json!({
            "work_item_id": "wi-1",
            "payload": { "amount": 10 }
        }))
        .unwrap();
        let from_string: WorkItemUpdate = serde_json::from_value(json!({
            "work_item_id": "wi-1",
            "payload": "{\"amount\": 10}"
        }))
        .unwrap();

        assert_eq!(from_object, from_string);
        assert!(from_object.is_actionable());
    }

    #[test]
    fn update_rejects_malformed_encoded_payload() {
        let result = serde_json::from_value::<WorkItemUpdate>(json!({
            "work_item_id": "wi-1",
            "payload": "{not json"
        }));
        assert!(result.is_err());

        let not_an_object = serde_json::from_value::<WorkItemUpdate>(json!({
            "work_item_id": "wi-1",
            "payload": [1, 2, 3]
        }));
        assert!(not_an_object.is_err());
    }

    #[test]
    fn empty_or_missing_parts_are_not_actionable() {
        let missing_payload: WorkItemUpdate = serde_json::from_value(json!({ "work_item_id": "wi-1" })).unwrap();
        let empty_payload: WorkItemUpdate = serde_json::from_value(json!({ "work_item_id": "wi-1", "payload": {} })).unwrap();
        let missing_id: WorkItemUpdate = serde_json::from_value(json!({ "payload": { "a": 1 } })).unwrap();

        assert!(!missing_payload.is_actionable());
        assert!(!empty_payload.is_actionable());
        assert!(!missing_id.is_actionable());
    }

    #[test]
    fn outcomes_serialize_with_status_tag() {
        let success = MutationOutcome::success("wi-1", json!({ "ok": true }));
        let failure = MutationOutcome::failure("wi-2", "boom");

        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({ "work_item_id": "wi-1", "status": "success", "response": { "ok": true } })
        );
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "work_item_id": "wi-2", "status": "failure", "error": "boom" })
        );
    }

    #[test]
    fn retry_batch_operation_shape() {
        let body = BatchOperation::retry(vec!["a".into(), "b".into()]);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "batch_operation": "retry", "work_item_ids": ["a", "b"] })
        );
    }
}
