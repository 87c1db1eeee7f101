//! Shared fakes for service-level integration tests.
#![allow(dead_code)]

use crm_core::model::entity::{
    Communication, Initiative, OwnerId, Relationship, SourceKind, WorkItem,
};
use crm_core::model::snapshot::StatCounter;
use crm_core::repo::source::{
    CommunicationCount, CommunicationFilter, CommunicationStore, InitiativeCount,
    InitiativeFilter, InitiativeStore, RelationshipCount, RelationshipFilter, RelationshipStore,
    RepoError, RepoResult, WorkItemCount, WorkItemFilter, WorkItemStore,
};
use crm_core::Diagnostics;
use std::cell::RefCell;

pub const DAY: i64 = 86_400_000;

/// Source that fails every call.
pub struct FailingStore;

fn unavailable<T>() -> RepoResult<T> {
    Err(RepoError::Unavailable("connection refused".to_string()))
}

impl CommunicationStore for FailingStore {
    fn list_recent(&self, _: OwnerId, _: Option<i64>, _: u32) -> RepoResult<Vec<Communication>> {
        unavailable()
    }
    fn list_by_owner(
        &self,
        _: OwnerId,
        _: &CommunicationFilter,
        _: u32,
        _: u32,
    ) -> RepoResult<Vec<Communication>> {
        unavailable()
    }
    fn count(&self, _: OwnerId, _: &CommunicationCount) -> RepoResult<i64> {
        unavailable()
    }
}

impl WorkItemStore for FailingStore {
    fn list_recent(&self, _: OwnerId, _: Option<i64>, _: u32) -> RepoResult<Vec<WorkItem>> {
        unavailable()
    }
    fn list_by_owner(
        &self,
        _: OwnerId,
        _: &WorkItemFilter,
        _: u32,
        _: u32,
    ) -> RepoResult<Vec<WorkItem>> {
        unavailable()
    }
    fn count(&self, _: OwnerId, _: &WorkItemCount) -> RepoResult<i64> {
        unavailable()
    }
}

impl InitiativeStore for FailingStore {
    fn list_recent(&self, _: OwnerId, _: Option<i64>, _: u32) -> RepoResult<Vec<Initiative>> {
        unavailable()
    }
    fn list_by_owner(
        &self,
        _: OwnerId,
        _: &InitiativeFilter,
        _: u32,
        _: u32,
    ) -> RepoResult<Vec<Initiative>> {
        unavailable()
    }
    fn count(&self, _: OwnerId, _: &InitiativeCount) -> RepoResult<i64> {
        unavailable()
    }
}

impl RelationshipStore for FailingStore {
    fn list_recent(&self, _: OwnerId, _: Option<i64>, _: u32) -> RepoResult<Vec<Relationship>> {
        unavailable()
    }
    fn list_by_owner(
        &self,
        _: OwnerId,
        _: &RelationshipFilter,
        _: u32,
        _: u32,
    ) -> RepoResult<Vec<Relationship>> {
        unavailable()
    }
    fn count(&self, _: OwnerId, _: &RelationshipCount) -> RepoResult<i64> {
        unavailable()
    }
}

/// In-memory source returning its records as given, capped at `limit`.
///
/// Filters and count predicates are ignored; `count` reports the number of
/// owned records.
#[derive(Default)]
pub struct MemoryStore {
    pub communications: Vec<Communication>,
    pub work_items: Vec<WorkItem>,
    pub initiatives: Vec<Initiative>,
    pub relationships: Vec<Relationship>,
    /// Largest `limit` passed to any `list_recent` call.
    pub max_requested: RefCell<u32>,
}

impl MemoryStore {
    fn owned<T: Clone>(
        &self,
        records: &[T],
        owner_id: OwnerId,
        owner_of: impl Fn(&T) -> OwnerId,
        limit: u32,
    ) -> Vec<T> {
        records
            .iter()
            .filter(|record| owner_of(*record) == owner_id)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    fn note_limit(&self, limit: u32) {
        let mut max = self.max_requested.borrow_mut();
        *max = (*max).max(limit);
    }
}

impl CommunicationStore for MemoryStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        _: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Communication>> {
        self.note_limit(limit);
        Ok(self.owned(&self.communications, owner_id, |r: &Communication| r.owner_id, limit))
    }
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        _: &CommunicationFilter,
        limit: u32,
        _: u32,
    ) -> RepoResult<Vec<Communication>> {
        Ok(self.owned(&self.communications, owner_id, |r: &Communication| r.owner_id, limit))
    }
    fn count(&self, owner_id: OwnerId, _: &CommunicationCount) -> RepoResult<i64> {
        Ok(self.owned(&self.communications, owner_id, |r: &Communication| r.owner_id, u32::MAX).len() as i64)
    }
}

impl WorkItemStore for MemoryStore {
    fn list_recent(&self, owner_id: OwnerId, _: Option<i64>, limit: u32) -> RepoResult<Vec<WorkItem>> {
        self.note_limit(limit);
        Ok(self.owned(&self.work_items, owner_id, |r: &WorkItem| r.owner_id, limit))
    }
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        _: &WorkItemFilter,
        limit: u32,
        _: u32,
    ) -> RepoResult<Vec<WorkItem>> {
        Ok(self.owned(&self.work_items, owner_id, |r: &WorkItem| r.owner_id, limit))
    }
    fn count(&self, owner_id: OwnerId, _: &WorkItemCount) -> RepoResult<i64> {
        Ok(self.owned(&self.work_items, owner_id, |r: &WorkItem| r.owner_id, u32::MAX).len() as i64)
    }
}

impl InitiativeStore for MemoryStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        _: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Initiative>> {
        self.note_limit(limit);
        Ok(self.owned(&self.initiatives, owner_id, |r: &Initiative| r.owner_id, limit))
    }
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        _: &InitiativeFilter,
        limit: u32,
        _: u32,
    ) -> RepoResult<Vec<Initiative>> {
        Ok(self.owned(&self.initiatives, owner_id, |r: &Initiative| r.owner_id, limit))
    }
    fn count(&self, owner_id: OwnerId, _: &InitiativeCount) -> RepoResult<i64> {
        Ok(self.owned(&self.initiatives, owner_id, |r: &Initiative| r.owner_id, u32::MAX).len() as i64)
    }
}

impl RelationshipStore for MemoryStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        _: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Relationship>> {
        self.note_limit(limit);
        Ok(self.owned(&self.relationships, owner_id, |r: &Relationship| r.owner_id, limit))
    }
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        _: &RelationshipFilter,
        limit: u32,
        _: u32,
    ) -> RepoResult<Vec<Relationship>> {
        Ok(self.owned(&self.relationships, owner_id, |r: &Relationship| r.owner_id, limit))
    }
    fn count(&self, owner_id: OwnerId, _: &RelationshipCount) -> RepoResult<i64> {
        Ok(self.owned(&self.relationships, owner_id, |r: &Relationship| r.owner_id, u32::MAX).len() as i64)
    }
}

/// Diagnostics sink that records degradations and failures.
#[derive(Default)]
pub struct RecordingDiagnostics {
    pub degraded_counters: RefCell<Vec<StatCounter>>,
    pub degraded_panels: RefCell<Vec<SourceKind>>,
    pub failed_sources: RefCell<Vec<SourceKind>>,
    pub dashboards: RefCell<Vec<usize>>,
}

impl Diagnostics for RecordingDiagnostics {
    fn counter_degraded(&self, _: OwnerId, counter: StatCounter, _: &RepoError) {
        self.degraded_counters.borrow_mut().push(counter);
    }

    fn recent_items_degraded(&self, _: OwnerId, kind: SourceKind, _: &RepoError) {
        self.degraded_panels.borrow_mut().push(kind);
    }

    fn source_failed(&self, _: OwnerId, kind: SourceKind, _: &RepoError) {
        self.failed_sources.borrow_mut().push(kind);
    }

    fn feed_built(&self, _: OwnerId, _: usize, _: u128) {}

    fn statistics_built(&self, _: OwnerId, _: usize, _: u128) {}

    fn dashboard_built(&self, _: OwnerId, degraded_panels: usize, _: u128) {
        self.dashboards.borrow_mut().push(degraded_panels);
    }
}
