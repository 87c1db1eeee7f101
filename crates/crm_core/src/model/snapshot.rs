//! Statistics and dashboard snapshots.
//!
//! # Responsibility
//! - Define the closed counter set produced by the statistics aggregator.
//! - Define the composite dashboard response and its lossy item projection.
//!
//! # Invariants
//! - Every counter is sourced independently; a degraded counter reads `0`.
//! - Snapshots are request-scoped and never cached.

use crate::model::activity::ActivityEvent;
use crate::model::entity::{RecordId, SourceKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Name of one statistics counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCounter {
    TotalRelationships,
    Clients,
    Leads,
    RecentRelationships,
    TotalWorkItems,
    PendingWorkItems,
    CompletedWorkItems,
    OverdueWorkItems,
    RecentWorkItems,
    TotalInitiatives,
    ActiveInitiatives,
    CompletedInitiatives,
    CancelledInitiatives,
    RecentInitiatives,
    TotalCommunications,
    RecentCommunications,
}

impl StatCounter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TotalRelationships => "total_relationships",
            Self::Clients => "clients",
            Self::Leads => "leads",
            Self::RecentRelationships => "recent_relationships",
            Self::TotalWorkItems => "total_work_items",
            Self::PendingWorkItems => "pending_work_items",
            Self::CompletedWorkItems => "completed_work_items",
            Self::OverdueWorkItems => "overdue_work_items",
            Self::RecentWorkItems => "recent_work_items",
            Self::TotalInitiatives => "total_initiatives",
            Self::ActiveInitiatives => "active_initiatives",
            Self::CompletedInitiatives => "completed_initiatives",
            Self::CancelledInitiatives => "cancelled_initiatives",
            Self::RecentInitiatives => "recent_initiatives",
            Self::TotalCommunications => "total_communications",
            Self::RecentCommunications => "recent_communications",
        }
    }

    /// Entity kind whose store backs this counter.
    pub fn source_kind(self) -> SourceKind {
        match self {
            Self::TotalRelationships | Self::Clients | Self::Leads | Self::RecentRelationships => {
                SourceKind::Relationship
            }
            Self::TotalWorkItems
            | Self::PendingWorkItems
            | Self::CompletedWorkItems
            | Self::OverdueWorkItems
            | Self::RecentWorkItems => SourceKind::WorkItem,
            Self::TotalInitiatives
            | Self::ActiveInitiatives
            | Self::CompletedInitiatives
            | Self::CancelledInitiatives
            | Self::RecentInitiatives => SourceKind::Initiative,
            Self::TotalCommunications | Self::RecentCommunications => SourceKind::Communication,
        }
    }
}

impl Display for StatCounter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat set of per-kind counters for one owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub total_relationships: i64,
    pub clients: i64,
    pub leads: i64,
    pub recent_relationships: i64,
    pub total_work_items: i64,
    pub pending_work_items: i64,
    pub completed_work_items: i64,
    pub overdue_work_items: i64,
    pub recent_work_items: i64,
    pub total_initiatives: i64,
    pub active_initiatives: i64,
    pub completed_initiatives: i64,
    pub cancelled_initiatives: i64,
    pub recent_initiatives: i64,
    pub total_communications: i64,
    pub recent_communications: i64,
}

/// Display-only projection of one entity for a dashboard panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItem {
    pub id: RecordId,
    pub kind: SourceKind,
    pub title: String,
    /// Status or type label, e.g. `pending`, `in_progress`, `client`, `call`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_name: Option<String>,
    pub timestamp: i64,
}

/// Composite dashboard response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub statistics: StatisticsSnapshot,
    pub recent_activity: Vec<ActivityEvent>,
    pub recent_communications: Vec<RecentItem>,
    pub recent_work_items: Vec<RecentItem>,
    pub recent_initiatives: Vec<RecentItem>,
    pub recent_relationships: Vec<RecentItem>,
}
