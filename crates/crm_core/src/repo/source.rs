//! Data source contracts consumed by the aggregation engine.
//!
//! # Responsibility
//! - Define one store trait per entity kind with a uniform read surface:
//!   `list_recent`, `list_by_owner` and `count`.
//! - Define per-kind listing filters and count predicates.
//! - Define the shared repository error type.
//!
//! # Invariants
//! - Every query is scoped to one owner.
//! - Associations are resolved by the store, never lazily by callers.
//! - Stores are read-only from the engine's point of view.

use crate::db::DbError;
use crate::model::entity::{
    Communication, CommunicationType, Initiative, InitiativeStatus, OwnerId, Priority, RecordId,
    Relationship, RelationshipType, ValidationError, WorkItem, WorkItemStatus,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
    /// The backing source could not be reached or timed out.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Unavailable(message) => write!(f, "source unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing filter for communications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunicationFilter {
    pub kind: Option<CommunicationType>,
    /// Inclusive lower bound on `occurred_on`.
    pub occurred_from: Option<i64>,
    /// Inclusive upper bound on `occurred_on`.
    pub occurred_to: Option<i64>,
    pub relationship_id: Option<RecordId>,
}

/// Listing filter for work items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemFilter {
    pub status: Option<WorkItemStatus>,
    pub priority: Option<Priority>,
    pub relationship_id: Option<RecordId>,
    pub initiative_id: Option<RecordId>,
    /// Inclusive upper bound on `due_at`.
    pub due_before: Option<i64>,
    /// Inclusive lower bound on `due_at`.
    pub due_after: Option<i64>,
}

/// Listing filter for initiatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitiativeFilter {
    pub status: Option<InitiativeStatus>,
    pub client_id: Option<RecordId>,
}

/// Sort order for relationship listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelationshipOrder {
    #[default]
    Name,
    RecentlyUpdated,
}

/// Listing filter for relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipFilter {
    pub kind: Option<RelationshipType>,
    /// Case-insensitive substring match on name, email or company.
    pub search: Option<String>,
    pub order: RelationshipOrder,
}

/// Count predicate for communications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunicationCount {
    All,
    OfType(CommunicationType),
    /// `occurred_on >= since`.
    OccurredSince(i64),
}

/// Count predicate for work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItemCount {
    All,
    WithStatus(WorkItemStatus),
    /// Pending items whose `due_at` is strictly before the given instant.
    OverdueAt(i64),
    CreatedSince(i64),
}

/// Count predicate for initiatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiativeCount {
    All,
    WithStatus(InitiativeStatus),
    CreatedSince(i64),
}

/// Count predicate for relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipCount {
    All,
    OfType(RelationshipType),
    CreatedSince(i64),
}

/// Read contract for communications.
///
/// `list_recent` lists rows touched at or after `since` (all rows when
/// `None`), newest `updated_at` first, capped at `limit`.
pub trait CommunicationStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Communication>>;
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &CommunicationFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Communication>>;
    fn count(&self, owner_id: OwnerId, predicate: &CommunicationCount) -> RepoResult<i64>;
}

/// Read contract for work items. See [`CommunicationStore`] for `list_recent`.
pub trait WorkItemStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<WorkItem>>;
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &WorkItemFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<WorkItem>>;
    fn count(&self, owner_id: OwnerId, predicate: &WorkItemCount) -> RepoResult<i64>;
}

/// Read contract for initiatives. See [`CommunicationStore`] for `list_recent`.
pub trait InitiativeStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Initiative>>;
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &InitiativeFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Initiative>>;
    fn count(&self, owner_id: OwnerId, predicate: &InitiativeCount) -> RepoResult<i64>;
}

/// Read contract for relationships. See [`CommunicationStore`] for `list_recent`.
pub trait RelationshipStore {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Relationship>>;
    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &RelationshipFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Relationship>>;
    fn count(&self, owner_id: OwnerId, predicate: &RelationshipCount) -> RepoResult<i64>;
}

/// One handle per entity source, as consumed by the services.
#[derive(Clone, Copy)]
pub struct SourceSet<'a> {
    pub communications: &'a dyn CommunicationStore,
    pub work_items: &'a dyn WorkItemStore,
    pub initiatives: &'a dyn InitiativeStore,
    pub relationships: &'a dyn RelationshipStore,
}
