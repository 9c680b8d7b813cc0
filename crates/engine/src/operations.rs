use crate::batch;
use crate::endpoints::Endpoints;
use crate::pagination::collect_all_pages;
use controlroom_api::{ControlRoomClient, ControlRoomConfig, ControlRoomError, Gateway};
use controlroom_types::{
    GetAssetInput, GetStepRunArtifactInput, GetWorkItemsInput, ListProcessRunsInput, ListStepRunArtifactsInput, ListStepRunsInput,
    ListWorkItemsInput, Listing, PayloadUpdates, RetryWorkItemsInput, StartProcessRunInput, UpdateWorkItemPayloadInput, WorkItemDetail,
};
use serde_json::Value;
use tracing::{debug, info};

/// Every Control Room operation, bound to one gateway and workspace.
///
/// Operations run to completion one request at a time; nothing is cached
/// between calls.
pub struct ControlRoom<G: Gateway = ControlRoomClient> {
    gateway: G,
    endpoints: Endpoints,
}

impl ControlRoom<ControlRoomClient> {
    pub fn from_client(client: ControlRoomClient) -> Self {
        let endpoints = Endpoints::new(client.config().workspace_url());
        Self::new(client, endpoints)
    }

    /// Build a client-backed facade from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ControlRoomError> {
        Ok(Self::from_client(ControlRoomClient::from_env()?))
    }
}

impl<G: Gateway> ControlRoom<G> {
    pub fn new(gateway: G, endpoints: Endpoints) -> Self {
        Self { gateway, endpoints }
    }

    pub fn with_config(gateway: G, config: &ControlRoomConfig) -> Self {
        Self::new(gateway, Endpoints::new(config.workspace_url()))
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn list_processes(&self) -> Result<Value, ControlRoomError> {
        self.gateway.get(&self.endpoints.processes()).await
    }

    /// List runs of a process. Single page only; an unknown state filter is dropped.
    pub async fn list_process_runs(&self, input: &ListProcessRunsInput) -> Result<Value, ControlRoomError> {
        let state = input.state_filter();
        if input.state.is_some() && state.is_none() {
            debug!(state = ?input.state, "ignoring unsupported process run state filter");
        }
        let url = self.endpoints.process_runs(&input.process_id, input.limit, state)?;
        self.gateway.get(&url).await
    }

    pub async fn list_step_runs(&self, input: &ListStepRunsInput) -> Result<Value, ControlRoomError> {
        let url = self.endpoints.step_runs(&input.process_run_id)?;
        self.gateway.get(&url).await
    }

    pub async fn list_step_run_artifacts(&self, input: &ListStepRunArtifactsInput) -> Result<Value, ControlRoomError> {
        let url = self.endpoints.step_run_artifacts(&input.step_run_id)?;
        self.gateway.get(&url).await
    }

    pub async fn get_step_run_artifact(&self, input: &GetStepRunArtifactInput) -> Result<Value, ControlRoomError> {
        let url = self.endpoints.step_run_artifact(&input.step_run_id, &input.artifact_id)?;
        self.gateway.get(&url).await
    }

    pub async fn list_workers(&self) -> Result<Value, ControlRoomError> {
        self.gateway.get(&self.endpoints.workers()).await
    }

    pub async fn list_assets(&self) -> Result<Value, ControlRoomError> {
        self.gateway.get(&self.endpoints.assets()).await
    }

    pub async fn get_asset(&self, input: &GetAssetInput) -> Result<Value, ControlRoomError> {
        let url = self.endpoints.asset(&input.asset_id)?;
        self.gateway.get(&url).await
    }

    /// Start a new run of a process and return the run descriptor.
    pub async fn start_process_run(&self, input: &StartProcessRunInput) -> Result<Value, ControlRoomError> {
        let url = self.endpoints.start_process_run(&input.process_id)?;
        info!(process_id = %input.process_id, "starting process run");
        self.gateway.post(&url, None).await
    }

    /// List every work item of a process run, following pagination to the end.
    pub async fn list_work_items(&self, input: &ListWorkItemsInput) -> Result<Listing<Value>, ControlRoomError> {
        let state = input.state_filter();
        if input.state.is_some() && state.is_none() {
            debug!(state = ?input.state, "ignoring unsupported work item state filter");
        }
        let url = self.endpoints.work_items(&input.process_id, &input.process_run_id, state)?;
        let items = collect_all_pages(&self.gateway, &url).await?;
        Ok(Listing::new(items))
    }

    pub async fn get_all_work_items(&self, input: &GetWorkItemsInput) -> Result<Listing<WorkItemDetail>, ControlRoomError> {
        let details = batch::fetch_work_item_details(&self.gateway, &self.endpoints, &input.work_item_ids).await?;
        Ok(Listing::new(details))
    }

    pub async fn update_work_item_payloads(&self, input: &UpdateWorkItemPayloadInput) -> PayloadUpdates {
        let updates = batch::update_work_item_payloads(&self.gateway, &self.endpoints, &input.work_item_updates).await;
        PayloadUpdates { updates }
    }

    pub async fn retry_work_items(&self, input: &RetryWorkItemsInput) -> Result<Value, ControlRoomError> {
        batch::retry_work_items(&self.gateway, &self.endpoints, &input.work_item_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGateway;
    use controlroom_api::Method;
    use controlroom_types::WorkItemUpdate;
    use serde_json::json;

    const WORKSPACE: &str = "https://cr.example/api/v1/workspaces/ws-1";

    fn control_room(gateway: ScriptedGateway) -> ControlRoom<ScriptedGateway> {
        ControlRoom::new(gateway, Endpoints::new(WORKSPACE))
    }

    #[tokio::test]
    async fn list_process_runs_drops_unknown_state() {
        let room = control_room(ScriptedGateway::new().ok(json!({ "data": [] })).ok(json!({ "data": [] })));

        let mut input = ListProcessRunsInput::new("p-1");
        input.state = Some("bogus".into());
        room.list_process_runs(&input).await.unwrap();
        input.state = Some("completed".into());
        room.list_process_runs(&input).await.unwrap();

        assert_eq!(
            room.gateway().requested_urls(),
            vec![
                format!("{WORKSPACE}/process-runs?process_id=p-1&limit=10"),
                format!("{WORKSPACE}/process-runs?process_id=p-1&limit=10&state=completed"),
            ]
        );
    }

    #[tokio::test]
    async fn list_process_runs_is_not_aggregated() {
        let first_page = json!({ "data": [{ "id": "r-1" }], "has_more": true, "next": "https://cr.example/next" });
        let room = control_room(ScriptedGateway::new().ok(first_page.clone()));

        let runs = room.list_process_runs(&ListProcessRunsInput::new("p-1")).await.unwrap();

        assert_eq!(runs, first_page);
        assert_eq!(room.gateway().call_count(), 1);
    }

    #[tokio::test]
    async fn list_work_items_aggregates_every_page() {
        let room = control_room(
            ScriptedGateway::new()
                .ok(json!({ "data": [{ "id": "a" }, { "id": "b" }], "has_more": true, "next": "https://cr.example/p2" }))
                .ok(json!({ "data": [{ "id": "c" }, { "id": "d" }], "has_more": true, "next": "https://cr.example/p3" }))
                .ok(json!({ "data": [{ "id": "e" }], "has_more": false })),
        );
        let input = ListWorkItemsInput {
            process_id: "p-1".into(),
            process_run_id: "r-1".into(),
            state: Some("failed".into()),
        };

        let listing = room.list_work_items(&input).await.unwrap();

        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!({ "data": [{ "id": "a" }, { "id": "b" }, { "id": "c" }, { "id": "d" }, { "id": "e" }] })
        );
        assert_eq!(
            room.gateway().requested_urls()[0],
            format!("{WORKSPACE}/work-items?process_id=p-1&process_run_id=r-1&state=failed")
        );
    }

    #[tokio::test]
    async fn list_work_items_propagates_page_failure() {
        let room = control_room(
            ScriptedGateway::new()
                .ok(json!({ "data": [{ "id": "a" }], "has_more": true, "next": "https://cr.example/p2" }))
                .fail(500, "page two exploded"),
        );
        let input = ListWorkItemsInput {
            process_id: "p-1".into(),
            process_run_id: "r-1".into(),
            state: None,
        };

        let error = room.list_work_items(&input).await.unwrap_err();
        assert!(error.to_string().contains("page two exploded"));
    }

    #[tokio::test]
    async fn start_process_run_posts_without_body() {
        let room = control_room(ScriptedGateway::new().created(json!({ "id": "run-1" })));

        let run = room
            .start_process_run(&StartProcessRunInput { process_id: "p-1".into() })
            .await
            .unwrap();

        assert_eq!(run, json!({ "id": "run-1" }));
        let request = &room.gateway().requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, format!("{WORKSPACE}/processes/p-1/process-runs"));
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn start_process_run_surfaces_remote_errors() {
        let room = control_room(ScriptedGateway::new().fail(409, "process disabled"));

        let error = room
            .start_process_run(&StartProcessRunInput { process_id: "p-1".into() })
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(409));
    }

    #[tokio::test]
    async fn single_resource_lookups_hit_expected_paths() {
        let room = control_room(
            ScriptedGateway::new()
                .ok(json!({ "data": [] }))
                .ok(json!({ "data": [] }))
                .ok(json!({ "data": [] }))
                .ok(json!({ "id": "asset-1" }))
                .ok(json!({ "data": [] }))
                .ok(json!({ "id": "art-1" }))
                .ok(json!({ "data": [] })),
        );

        room.list_processes().await.unwrap();
        room.list_workers().await.unwrap();
        room.list_assets().await.unwrap();
        room.get_asset(&GetAssetInput { asset_id: "asset-1".into() }).await.unwrap();
        room.list_step_run_artifacts(&ListStepRunArtifactsInput { step_run_id: "s-1".into() })
            .await
            .unwrap();
        room.get_step_run_artifact(&GetStepRunArtifactInput {
            step_run_id: "s-1".into(),
            artifact_id: "art-1".into(),
        })
        .await
        .unwrap();
        room.list_step_runs(&ListStepRunsInput { process_run_id: "r-1".into() })
            .await
            .unwrap();

        assert_eq!(
            room.gateway().requested_urls(),
            vec![
                format!("{WORKSPACE}/processes"),
                format!("{WORKSPACE}/workers"),
                format!("{WORKSPACE}/assets"),
                format!("{WORKSPACE}/assets/asset-1"),
                format!("{WORKSPACE}/step-runs/s-1/artifacts"),
                format!("{WORKSPACE}/step-runs/s-1/artifacts/art-1"),
                format!("{WORKSPACE}/step-runs?process_run_id=r-1&limit=1"),
            ]
        );
    }

    #[tokio::test]
    async fn update_payloads_counts_only_valid_requests() {
        let room = control_room(ScriptedGateway::new().ok(json!({ "ok": true })));
        let input: UpdateWorkItemPayloadInput = serde_json::from_value(json!({
            "work_item_updates": [
                { "work_item_id": "wi-1", "payload": "{\"total\": 12}" },
                { "work_item_id": "wi-2", "payload": {} }
            ]
        }))
        .unwrap();

        let result = room.update_work_item_payloads(&input).await;

        assert_eq!(result.updates.len(), 1);
        assert_eq!(result.succeeded(), 1);
        assert_eq!(result.failed(), 0);
        assert_eq!(room.gateway().requests()[0].body, Some(json!({ "payload": { "total": 12 } })));
    }

    #[tokio::test]
    async fn update_payloads_reports_outcomes_in_order() {
        let room = control_room(
            ScriptedGateway::new()
                .ok(json!({ "n": 1 }))
                .fail(500, "oops")
                .ok(json!({ "n": 3 })),
        );
        let updates = ["wi-1", "wi-2", "wi-3"]
            .iter()
            .map(|id| WorkItemUpdate::new(*id, json!({ "k": id }).as_object().cloned().unwrap()))
            .collect();

        let result = room
            .update_work_item_payloads(&UpdateWorkItemPayloadInput { work_item_updates: updates })
            .await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "updates": [
                    { "work_item_id": "wi-1", "status": "success", "response": { "n": 1 } },
                    { "work_item_id": "wi-2", "status": "failure", "error": "oops" },
                    { "work_item_id": "wi-3", "status": "success", "response": { "n": 3 } }
                ]
            })
        );
    }

    #[tokio::test]
    async fn get_all_work_items_wraps_projection() {
        let room = control_room(
            ScriptedGateway::new()
                .ok(json!({ "id": "a", "state": "new", "payload": { "x": 1 } }))
                .ok(json!({ "id": "b", "created_at": "2024-02-02", "exception": { "msg": "bad" } })),
        );

        let listing = room
            .get_all_work_items(&GetWorkItemsInput {
                work_item_ids: vec!["a".into(), "b".into()],
            })
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!({
                "data": [
                    { "id": "a", "exception": null, "payload": { "x": 1 } },
                    { "id": "b", "exception": { "msg": "bad" }, "payload": null }
                ]
            })
        );
    }

    #[tokio::test]
    async fn retry_work_items_relays_response() {
        let room = control_room(ScriptedGateway::new().ok(json!({ "retried": 2 })));

        let response = room
            .retry_work_items(&RetryWorkItemsInput {
                work_item_ids: vec!["a".into(), "b".into()],
            })
            .await
            .unwrap();

        assert_eq!(response, json!({ "retried": 2 }));
        assert_eq!(room.gateway().call_count(), 1);
    }
}
