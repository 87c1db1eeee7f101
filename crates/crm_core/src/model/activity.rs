//! Derived activity events.
//!
//! # Responsibility
//! - Define the normalized event shape shared by all four entity kinds.
//! - Define the feed envelope returned to callers.
//!
//! # Invariants
//! - Events are computed on read; nothing here is persisted.
//! - `source_id` is not unique in a feed: one record may yield several events.
//! - `related_id` and `related_name` are either both set or both unset.

use crate::model::entity::{RecordId, SourceKind};
use serde::{Deserialize, Serialize};

/// What happened to the source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Completed,
    Started,
    Cancelled,
}

/// One semantic activity synthesized from a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub source_id: RecordId,
    pub source_kind: SourceKind,
    pub action: ActivityAction,
    /// Never empty; falls back to a kind-specific placeholder.
    pub title: String,
    /// Truncated free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Creation time for the creation-slot event, modification time otherwise.
    pub occurred_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_name: Option<String>,
}

/// Result envelope of the recent-activity entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeed {
    /// Ordered newest first.
    pub events: Vec<ActivityEvent>,
    /// Always equals `events.len()`.
    pub count: usize,
}

impl ActivityFeed {
    pub fn new(events: Vec<ActivityEvent>) -> Self {
        let count = events.len();
        Self { events, count }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
