//! State filters accepted by listing endpoints.
//!
//! Each listing only understands a fixed set of states. Callers hand in free
//! text; anything outside the allow-set is dropped so the listing falls back
//! to its unfiltered form rather than failing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// States accepted by the process-run listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessRunState {
    New,
    InProgress,
    Completed,
    Unresolved,
    Stopping,
}

impl ProcessRunState {
    pub const ALL: [ProcessRunState; 5] = [Self::New, Self::InProgress, Self::Completed, Self::Unresolved, Self::Stopping];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Unresolved => "unresolved",
            Self::Stopping => "stopping",
        }
    }

    /// Resolve an optional raw filter, silently discarding unknown values.
    pub fn from_filter(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| value.parse().ok())
    }
}

impl FromStr for ProcessRunState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

impl fmt::Display for ProcessRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States accepted by the work-item listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemState {
    New,
    Pending,
    InProgress,
    Failed,
    Done,
}

impl WorkItemState {
    pub const ALL: [WorkItemState; 5] = [Self::New, Self::Pending, Self::InProgress, Self::Failed, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Failed => "failed",
            Self::Done => "done",
        }
    }

    /// Resolve an optional raw filter, silently discarding unknown values.
    pub fn from_filter(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| value.parse().ok())
    }
}

impl FromStr for WorkItemState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

impl fmt::Display for WorkItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state string outside the allow-set of a listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state filter '{0}'")]
pub struct UnknownState(pub String);
