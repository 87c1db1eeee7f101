//! Core aggregation engine for the CRM workspace.
//! Turns communications, work items, initiatives and relationships into an
//! activity feed, statistics and a composite dashboard.

pub mod activity;
pub mod clock;
pub mod db;
pub mod diagnostics;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{open_db, open_db_in_memory, DbError};
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{ActivityAction, ActivityEvent, ActivityFeed};
pub use model::entity::{
    Communication, CommunicationType, Initiative, InitiativeStatus, OwnerId, Priority, RawRecord,
    RecordId, RelatedRef, Relationship, RelationshipType, SourceKind, ValidationError, WorkItem,
    WorkItemStatus,
};
pub use model::snapshot::{DashboardSnapshot, RecentItem, StatCounter, StatisticsSnapshot};
pub use repo::source::{
    CommunicationStore, InitiativeStore, RelationshipStore, RepoError, RepoResult, SourceSet,
    WorkItemStore,
};
pub use repo::SqliteStores;
pub use service::activity_service::{ActivityError, ActivityService};
pub use service::dashboard_service::{DashboardError, DashboardService};
pub use service::statistics_service::StatisticsService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
