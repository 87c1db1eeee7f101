//! Data source contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Define the read contracts the aggregation engine depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths reject invalid persisted enum values instead of masking them.
//! - Tombstoned rows (`is_deleted = 1`) are never returned or counted.

pub mod communication_repo;
pub mod initiative_repo;
mod query;
pub mod relationship_repo;
pub mod source;
pub mod work_item_repo;

use communication_repo::SqliteCommunicationStore;
use initiative_repo::SqliteInitiativeStore;
use relationship_repo::SqliteRelationshipStore;
use rusqlite::Connection;
use source::SourceSet;
use work_item_repo::SqliteWorkItemStore;

/// The four SQLite stores sharing one migrated connection.
pub struct SqliteStores<'conn> {
    pub communications: SqliteCommunicationStore<'conn>,
    pub work_items: SqliteWorkItemStore<'conn>,
    pub initiatives: SqliteInitiativeStore<'conn>,
    pub relationships: SqliteRelationshipStore<'conn>,
}

impl<'conn> SqliteStores<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            communications: SqliteCommunicationStore::new(conn),
            work_items: SqliteWorkItemStore::new(conn),
            initiatives: SqliteInitiativeStore::new(conn),
            relationships: SqliteRelationshipStore::new(conn),
        }
    }

    pub fn sources(&self) -> SourceSet<'_> {
        SourceSet {
            communications: &self.communications,
            work_items: &self.work_items,
            initiatives: &self.initiatives,
            relationships: &self.relationships,
        }
    }
}
