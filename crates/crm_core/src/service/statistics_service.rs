//! Statistics aggregator.
//!
//! # Invariants
//! - Every counter is fetched by its own `count` call.
//! - A failed counter is reported through `Diagnostics` and reads `0`; the
//!   snapshot is always fully populated.

use crate::clock::{window_start, Clock};
use crate::diagnostics::Diagnostics;
use crate::model::entity::{InitiativeStatus, OwnerId, RelationshipType, WorkItemStatus};
use crate::model::snapshot::{StatCounter, StatisticsSnapshot};
use crate::repo::source::{
    CommunicationCount, InitiativeCount, RelationshipCount, RepoResult, SourceSet, WorkItemCount,
};
use std::cell::Cell;
use std::time::Instant;

/// Trailing window, in days, for the `recent_*` counters.
pub const STATS_RECENT_WINDOW_DAYS: u32 = 7;

pub struct StatisticsService<'a> {
    sources: SourceSet<'a>,
    diagnostics: &'a dyn Diagnostics,
    clock: &'a dyn Clock,
}

impl<'a> StatisticsService<'a> {
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

    /// Computes the owner's counters. Never fails.
    pub fn statistics(&self, owner_id: OwnerId) -> StatisticsSnapshot {
        let started_at = Instant::now();
        let now = self.clock.now_ms();
        let since = window_start(now, STATS_RECENT_WINDOW_DAYS);
        let tally = Tally {
            owner_id,
            diagnostics: self.diagnostics,
            degraded: Cell::new(0),
        };

        let relationships = self.sources.relationships;
        let work_items = self.sources.work_items;
        let initiatives = self.sources.initiatives;
        let communications = self.sources.communications;

        let snapshot = StatisticsSnapshot {
            total_relationships: tally.take(
                StatCounter::TotalRelationships,
                relationships.count(owner_id, &RelationshipCount::All),
            ),
            clients: tally.take(
                StatCounter::Clients,
                relationships.count(owner_id, &RelationshipCount::OfType(RelationshipType::Client)),
            ),
            leads: tally.take(
                StatCounter::Leads,
                relationships.count(owner_id, &RelationshipCount::OfType(RelationshipType::Lead)),
            ),
            recent_relationships: tally.take(
                StatCounter::RecentRelationships,
                relationships.count(owner_id, &RelationshipCount::CreatedSince(since)),
            ),
            total_work_items: tally.take(
                StatCounter::TotalWorkItems,
                work_items.count(owner_id, &WorkItemCount::All),
            ),
            pending_work_items: tally.take(
                StatCounter::PendingWorkItems,
                work_items.count(owner_id, &WorkItemCount::WithStatus(WorkItemStatus::Pending)),
            ),
            completed_work_items: tally.take(
                StatCounter::CompletedWorkItems,
                work_items.count(owner_id, &WorkItemCount::WithStatus(WorkItemStatus::Completed)),
            ),
            overdue_work_items: tally.take(
                StatCounter::OverdueWorkItems,
                work_items.count(owner_id, &WorkItemCount::OverdueAt(now)),
            ),
            recent_work_items: tally.take(
                StatCounter::RecentWorkItems,
                work_items.count(owner_id, &WorkItemCount::CreatedSince(since)),
            ),
            total_initiatives: tally.take(
                StatCounter::TotalInitiatives,
                initiatives.count(owner_id, &InitiativeCount::All),
            ),
            active_initiatives: tally.take(
                StatCounter::ActiveInitiatives,
                initiatives.count(
                    owner_id,
                    &InitiativeCount::WithStatus(InitiativeStatus::InProgress),
                ),
            ),
            completed_initiatives: tally.take(
                StatCounter::CompletedInitiatives,
                initiatives.count(
                    owner_id,
                    &InitiativeCount::WithStatus(InitiativeStatus::Completed),
                ),
            ),
            cancelled_initiatives: tally.take(
                StatCounter::CancelledInitiatives,
                initiatives.count(
                    owner_id,
                    &InitiativeCount::WithStatus(InitiativeStatus::Cancelled),
                ),
            ),
            recent_initiatives: tally.take(
                StatCounter::RecentInitiatives,
                initiatives.count(owner_id, &InitiativeCount::CreatedSince(since)),
            ),
            total_communications: tally.take(
                StatCounter::TotalCommunications,
                communications.count(owner_id, &CommunicationCount::All),
            ),
            recent_communications: tally.take(
                StatCounter::RecentCommunications,
                communications.count(owner_id, &CommunicationCount::OccurredSince(since)),
            ),
        };

        self.diagnostics.statistics_built(
            owner_id,
            tally.degraded.get(),
            started_at.elapsed().as_millis(),
        );
        snapshot
    }
}

struct Tally<'a> {
    owner_id: OwnerId,
    diagnostics: &'a dyn Diagnostics,
    degraded: Cell<usize>,
}

impl Tally<'_> {
    fn take(&self, counter: StatCounter, result: RepoResult<i64>) -> i64 {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.diagnostics
                    .counter_degraded(self.owner_id, counter, &err);
                self.degraded.set(self.degraded.get() + 1);
                0
            }
        }
    }
}
