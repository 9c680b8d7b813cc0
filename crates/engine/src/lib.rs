//! # Control Room Engine
//!
//! Orchestration on top of the Control Room request gateway:
//!
//! - **`endpoints`**: workspace-scoped URL construction with form-encoded queries
//! - **`pagination`**: draining `{ data, has_more, next }` listings page by page
//! - **`batch`**: multi-item work-item fetches, payload updates and retries
//! - **`operations`**: the [`ControlRoom`] facade exposing every operation
//!
//! ## Usage
//!
//! ```ignore
//! use controlroom_engine::ControlRoom;
//! use controlroom_types::ListWorkItemsInput;
//!
//! async fn failed_items() -> anyhow::Result<()> {
//!     let room = ControlRoom::from_env()?;
//!     let listing = room
//!         .list_work_items(&ListWorkItemsInput {
//!             process_id: "p-1".into(),
//!             process_run_id: "r-1".into(),
//!             state: Some("failed".into()),
//!         })
//!         .await?;
//!     println!("{} failed work items", listing.len());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod endpoints;
pub mod operations;
pub mod pagination;

#[cfg(test)]
mod test_support;

pub use batch::{fetch_work_item_details, retry_work_items, update_work_item_payloads};
pub use endpoints::Endpoints;
pub use operations::ControlRoom;
pub use pagination::{PageCursor, collect_all_pages};
