//! Dashboard composer.
//!
//! # Responsibility
//! - Combine statistics, a short activity feed and four recent-items panels.
//!
//! # Invariants
//! - An activity feed failure fails the composition.
//! - A failed recent-items panel degrades to empty; the others still load.
//! - Panels are lossy projections carrying display fields only.

use crate::activity::derive::display_title;
use crate::clock::Clock;
use crate::diagnostics::Diagnostics;
use crate::model::entity::{
    Communication, Initiative, InitiativeStatus, OwnerId, RelatedRef, Relationship, SourceKind,
    WorkItem, WorkItemStatus,
};
use crate::model::snapshot::{DashboardSnapshot, RecentItem};
use crate::repo::communication_repo::communication_type_to_db;
use crate::repo::initiative_repo::initiative_status_to_db;
use crate::repo::relationship_repo::relationship_type_to_db;
use crate::repo::source::{
    CommunicationFilter, InitiativeFilter, RelationshipFilter, RelationshipOrder, RepoResult,
    SourceSet, WorkItemFilter,
};
use crate::repo::work_item_repo::work_item_status_to_db;
use crate::service::activity_service::{ActivityError, ActivityService};
use crate::service::statistics_service::StatisticsService;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Number of events in the dashboard activity panel.
pub const DASHBOARD_ACTIVITY_LIMIT: i64 = 10;
/// Number of items in each recent-items panel.
pub const DASHBOARD_RECENT_LIMIT: u32 = 5;

/// Fail-fast error of dashboard composition.
#[derive(Debug)]
pub enum DashboardError {
    Activity(ActivityError),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activity(err) => write!(f, "dashboard activity panel failed: {err}"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Activity(err) => Some(err),
        }
    }
}

impl From<ActivityError> for DashboardError {
    fn from(value: ActivityError) -> Self {
        Self::Activity(value)
    }
}

pub struct DashboardService<'a> {
    sources: SourceSet<'a>,
    diagnostics: &'a dyn Diagnostics,
    clock: &'a dyn Clock,
}

impl<'a> DashboardService<'a> {
    pub fn new(
        sources: SourceSet<'a>,
        diagnostics: &'a dyn Diagnostics,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            sources,
            diagnostics,
            clock,
        }
    }

    /// Builds the owner's dashboard.
    ///
    /// # Errors
    /// - `DashboardError::Activity` when any activity source fails.
    pub fn dashboard(&self, owner_id: OwnerId) -> Result<DashboardSnapshot, DashboardError> {
        let started_at = Instant::now();

        let statistics =
            StatisticsService::new(self.sources, self.diagnostics, self.clock).statistics(owner_id);
        let recent_activity = ActivityService::new(self.sources, self.diagnostics)
            .recent_activity(owner_id, DASHBOARD_ACTIVITY_LIMIT)?
            .events;

        let degraded = Cell::new(0);
        let panel = |kind: SourceKind| match self.recent_items(owner_id, kind) {
            Ok(items) => items,
            Err(err) => {
                self.diagnostics.recent_items_degraded(owner_id, kind, &err);
                degraded.set(degraded.get() + 1);
                Vec::new()
            }
        };

        let snapshot = DashboardSnapshot {
            statistics,
            recent_activity,
            recent_communications: panel(SourceKind::Communication),
            recent_work_items: panel(SourceKind::WorkItem),
            recent_initiatives: panel(SourceKind::Initiative),
            recent_relationships: panel(SourceKind::Relationship),
        };

        self.diagnostics.dashboard_built(
            owner_id,
            degraded.get(),
            started_at.elapsed().as_millis(),
        );
        Ok(snapshot)
    }

    fn recent_items(&self, owner_id: OwnerId, kind: SourceKind) -> RepoResult<Vec<RecentItem>> {
        let limit = DASHBOARD_RECENT_LIMIT;
        let items = match kind {
            SourceKind::Communication => self
                .sources
                .communications
                .list_by_owner(owner_id, &CommunicationFilter::default(), limit, 0)?
                .iter()
                .map(project_communication)
                .collect(),
            SourceKind::WorkItem => {
                let filter = WorkItemFilter {
                    status: Some(WorkItemStatus::Pending),
                    ..WorkItemFilter::default()
                };
                self.sources
                    .work_items
                    .list_by_owner(owner_id, &filter, limit, 0)?
                    .iter()
                    .map(project_work_item)
                    .collect()
            }
            SourceKind::Initiative => {
                let filter = InitiativeFilter {
                    status: Some(InitiativeStatus::InProgress),
                    ..InitiativeFilter::default()
                };
                self.sources
                    .initiatives
                    .list_by_owner(owner_id, &filter, limit, 0)?
                    .iter()
                    .map(project_initiative)
                    .collect()
            }
            SourceKind::Relationship => {
                let filter = RelationshipFilter {
                    order: RelationshipOrder::RecentlyUpdated,
                    ..RelationshipFilter::default()
                };
                self.sources
                    .relationships
                    .list_by_owner(owner_id, &filter, limit, 0)?
                    .iter()
                    .map(project_relationship)
                    .collect()
            }
        };
        Ok(items)
    }
}

fn related_name(related: Option<&RelatedRef>) -> Option<String> {
    related
        .and_then(RelatedRef::named)
        .map(|related| related.name.clone())
}

fn project_communication(record: &Communication) -> RecentItem {
    RecentItem {
        id: record.id,
        kind: SourceKind::Communication,
        title: display_title(SourceKind::Communication, &record.subject),
        status: communication_type_to_db(record.kind).to_string(),
        related_name: related_name(record.relationship.as_ref()),
        timestamp: record.occurred_on,
    }
}

fn project_work_item(record: &WorkItem) -> RecentItem {
    RecentItem {
        id: record.id,
        kind: SourceKind::WorkItem,
        title: display_title(SourceKind::WorkItem, &record.title),
        status: work_item_status_to_db(record.status).to_string(),
        related_name: related_name(record.relationship.as_ref())
            .or_else(|| related_name(record.initiative.as_ref())),
        timestamp: record.updated_at,
    }
}

fn project_initiative(record: &Initiative) -> RecentItem {
    RecentItem {
        id: record.id,
        kind: SourceKind::Initiative,
        title: display_title(SourceKind::Initiative, &record.name),
        status: initiative_status_to_db(record.status).to_string(),
        related_name: related_name(record.client.as_ref()),
        timestamp: record.updated_at,
    }
}

fn project_relationship(record: &Relationship) -> RecentItem {
    RecentItem {
        id: record.id,
        kind: SourceKind::Relationship,
        title: display_title(SourceKind::Relationship, &record.name),
        status: relationship_type_to_db(record.kind).to_string(),
        related_name: Some(record.company.clone()).filter(|company| !company.trim().is_empty()),
        timestamp: record.updated_at,
    }
}
