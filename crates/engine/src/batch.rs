//! Multi-item work-item operations.
//!
//! The three batch shapes differ in how failures travel:
//!
//! - detail fetches stop at the first failed item and return nothing;
//! - payload updates isolate every item and always report one outcome per
//!   actionable request;
//! - retries are a single remote batch call, so there is nothing to isolate
//!   on this side.

use crate::endpoints::Endpoints;
use controlroom_api::{ControlRoomError, Gateway, Method, Reply};
use controlroom_types::{BatchOperation, MutationOutcome, WorkItemDetail, WorkItemUpdate};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

/// Fetch each work item in order and project it onto `id`, `exception` and `payload`.
///
/// Duplicate ids are fetched again and reported again. A failed fetch aborts
/// the batch and discards every projection gathered so far; blank ids are
/// rejected before any request is issued.
pub async fn fetch_work_item_details<G: Gateway + ?Sized>(
    gateway: &G,
    endpoints: &Endpoints,
    work_item_ids: &[String],
) -> Result<Vec<WorkItemDetail>, ControlRoomError> {
    let urls = work_item_ids
        .iter()
        .map(|work_item_id| endpoints.work_item(work_item_id))
        .collect::<Result<Vec<String>, ControlRoomError>>()?;

    let mut details = Vec::with_capacity(urls.len());
    for url in urls {
        let record = gateway.get(&url).await?;
        details.push(WorkItemDetail::project(&record));
    }
    debug!(count = details.len(), "work item details fetched");
    Ok(details)
}

/// Replace the payload of every actionable update, one request at a time.
///
/// Updates without a work item id or with an empty payload are skipped and
/// produce no outcome. Every other update yields exactly one outcome, in
/// input order, whatever happens to its siblings.
pub async fn update_work_item_payloads<G: Gateway + ?Sized>(
    gateway: &G,
    endpoints: &Endpoints,
    updates: &[WorkItemUpdate],
) -> Vec<MutationOutcome> {
    let mut outcomes = Vec::with_capacity(updates.len());
    for (index, update) in updates.iter().enumerate() {
        if !update.is_actionable() {
            debug!(index, work_item_id = %update.work_item_id, "skipping update without id or payload");
            continue;
        }
        let outcome = apply_payload_update(gateway, endpoints, update).await;
        if !outcome.is_success() {
            warn!(work_item_id = %outcome.work_item_id, "work item payload update failed");
        }
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|outcome| !outcome.is_success()).count();
    info!(
        requested = updates.len(),
        applied = outcomes.len(),
        failed,
        "work item payload updates finished"
    );
    outcomes
}

async fn apply_payload_update<G: Gateway + ?Sized>(gateway: &G, endpoints: &Endpoints, update: &WorkItemUpdate) -> MutationOutcome {
    let work_item_id = update.work_item_id.as_str();
    let url = match endpoints.work_item_payload(work_item_id) {
        Ok(url) => url,
        Err(error) => return MutationOutcome::failure(work_item_id, error.to_string()),
    };
    let body = json!({ "payload": update.payload });

    match gateway.send(Method::POST, &url, Some(&body)).await {
        Ok(Reply::Success { body, .. }) => MutationOutcome::success(work_item_id, body),
        Ok(Reply::Failure { body, .. }) => MutationOutcome::failure(work_item_id, body),
        Err(error) => MutationOutcome::failure(work_item_id, error.to_string()),
    }
}

/// Submit one `retry` batch operation covering every id.
///
/// The remote response body is returned verbatim.
pub async fn retry_work_items<G: Gateway + ?Sized>(
    gateway: &G,
    endpoints: &Endpoints,
    work_item_ids: &[String],
) -> Result<Value, ControlRoomError> {
    let operation = BatchOperation::retry(work_item_ids.to_vec());
    let body = serde_json::to_value(&operation).map_err(|error| ControlRoomError::invalid_input("work_item_ids", error.to_string()))?;
    info!(count = work_item_ids.len(), "submitting work item retry batch");
    gateway.post(&endpoints.work_items_batch(), Some(&body)).await
}
