//! Entity records as returned by the data sources.
//!
//! # Responsibility
//! - Define communication, work item, initiative and relationship records.
//! - Provide `RawRecord`, the closed sum type consumed by activity derivation.
//!
//! # Invariants
//! - Associations (`RelatedRef`) are resolved eagerly by the store.
//! - `validate()` must pass before a record is persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage identifier of one entity row.
pub type RecordId = i64;

/// Opaque identifier of the principal owning a data scope.
pub type OwnerId = i64;

/// Validation errors for entity write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `updated_at` is earlier than `created_at`.
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must not be earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for ValidationError {}

fn check_timestamps(created_at: i64, updated_at: i64) -> Result<(), ValidationError> {
    if updated_at < created_at {
        return Err(ValidationError::TimestampOrder {
            created_at,
            updated_at,
        });
    }
    Ok(())
}

/// Association to another entity, resolved by the source at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedRef {
    pub id: RecordId,
    /// Display name; may be empty when the target has no name.
    pub name: String,
}

impl RelatedRef {
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the reference only when it carries a usable display name.
    pub fn named(&self) -> Option<&Self> {
        if self.name.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Relationship classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Client,
    Lead,
}

/// Communication channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationType {
    Email,
    Call,
    Meeting,
    Other,
}

/// Work item priority. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Work item lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Pending,
    /// Terminal state.
    Completed,
}

/// Initiative lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    InProgress,
    Completed,
    Cancelled,
}

/// A person or organization the owner maintains contact with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Relationship {
    /// Creates an unsaved relationship stamped at `at`.
    ///
    /// `id` stays `0` until storage assigns one.
    pub fn new(owner_id: OwnerId, name: impl Into<String>, kind: RelationshipType, at: i64) -> Self {
        Self {
            id: 0,
            owner_id,
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            position: String::new(),
            kind,
            notes: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamps(self.created_at, self.updated_at)
    }
}

/// One logged contact (email, call, meeting) with a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Communication {
    pub id: RecordId,
    /// Owner of the backing relationship.
    pub owner_id: OwnerId,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    /// When the communication happened, as opposed to when it was logged.
    pub occurred_on: i64,
    pub subject: String,
    pub description: String,
    pub relationship_id: RecordId,
    /// Resolved backing relationship, when present.
    pub relationship: Option<RelatedRef>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Communication {
    /// Creates an unsaved communication stamped at `at`.
    pub fn new(
        relationship_id: RecordId,
        kind: CommunicationType,
        subject: impl Into<String>,
        at: i64,
    ) -> Self {
        Self {
            id: 0,
            owner_id: 0,
            kind,
            occurred_on: at,
            subject: subject.into(),
            description: String::new(),
            relationship_id,
            relationship: None,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamps(self.created_at, self.updated_at)
    }
}

/// An actionable task owned by one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub due_at: Option<i64>,
    pub priority: Priority,
    pub status: WorkItemStatus,
    pub relationship: Option<RelatedRef>,
    pub initiative: Option<RelatedRef>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl WorkItem {
    /// Creates an unsaved pending work item with medium priority.
    pub fn new(owner_id: OwnerId, title: impl Into<String>, at: i64) -> Self {
        Self {
            id: 0,
            owner_id,
            title: title.into(),
            description: String::new(),
            due_at: None,
            priority: Priority::Medium,
            status: WorkItemStatus::Pending,
            relationship: None,
            initiative: None,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == WorkItemStatus::Completed
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamps(self.created_at, self.updated_at)
    }
}

/// A body of work, usually delivered for a client relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: String,
    pub status: InitiativeStatus,
    pub client: Option<RelatedRef>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Initiative {
    /// Creates an unsaved in-progress initiative stamped at `at`.
    pub fn new(owner_id: OwnerId, name: impl Into<String>, at: i64) -> Self {
        Self {
            id: 0,
            owner_id,
            name: name.into(),
            description: String::new(),
            status: InitiativeStatus::InProgress,
            client: None,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_timestamps(self.created_at, self.updated_at)
    }
}

/// Entity kind discriminant shared by records, events and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Communication,
    WorkItem,
    Initiative,
    Relationship,
}

impl SourceKind {
    /// Fetch and merge order used by every aggregation path.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Communication,
        SourceKind::WorkItem,
        SourceKind::Initiative,
        SourceKind::Relationship,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::WorkItem => "work_item",
            Self::Initiative => "initiative",
            Self::Relationship => "relationship",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entity row prior to activity derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    Communication(Communication),
    WorkItem(WorkItem),
    Initiative(Initiative),
    Relationship(Relationship),
}

impl RawRecord {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Communication(_) => SourceKind::Communication,
            Self::WorkItem(_) => SourceKind::WorkItem,
            Self::Initiative(_) => SourceKind::Initiative,
            Self::Relationship(_) => SourceKind::Relationship,
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Self::Communication(record) => record.id,
            Self::WorkItem(record) => record.id,
            Self::Initiative(record) => record.id,
            Self::Relationship(record) => record.id,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            Self::Communication(record) => record.created_at,
            Self::WorkItem(record) => record.created_at,
            Self::Initiative(record) => record.created_at,
            Self::Relationship(record) => record.created_at,
        }
    }

    pub fn updated_at(&self) -> i64 {
        match self {
            Self::Communication(record) => record.updated_at,
            Self::WorkItem(record) => record.updated_at,
            Self::Initiative(record) => record.updated_at,
            Self::Relationship(record) => record.updated_at,
        }
    }
}

impl From<Communication> for RawRecord {
    fn from(value: Communication) -> Self {
        Self::Communication(value)
    }
}

impl From<WorkItem> for RawRecord {
    fn from(value: WorkItem) -> Self {
        Self::WorkItem(value)
    }
}

impl From<Initiative> for RawRecord {
    fn from(value: Initiative) -> Self {
        Self::Initiative(value)
    }
}

impl From<Relationship> for RawRecord {
    fn from(value: Relationship) -> Self {
        Self::Relationship(value)
    }
}
