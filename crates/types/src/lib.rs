//! Shared type definitions for the Control Room client.
//!
//! The models here describe the documents exchanged with the Control Room
//! REST API: listing pages, projected work items, payload updates, and the
//! per-item outcomes reported by batch mutations. Operation inputs live in
//! [`inputs`] and carry JSON Schema metadata so front-ends can describe them.

pub mod filters;
pub mod inputs;
pub mod page;
pub mod work_item;

pub use filters::{ProcessRunState, WorkItemState};
pub use inputs::*;
pub use page::{Listing, Page};
pub use work_item::{BatchOperation, MutationOutcome, MutationResult, PayloadError, PayloadUpdates, WorkItemDetail, WorkItemUpdate, decode_payload};
