//! SQLite-backed communication store.
//!
//! # Invariants
//! - Communications carry no owner column; ownership is resolved through
//!   the backing relationship.
//! - Communications of tombstoned relationships are invisible.

use crate::model::entity::{Communication, CommunicationType, OwnerId, RecordId, RelatedRef};
use crate::repo::query::{invalid_enum, SelectQuery};
use crate::repo::source::{
    CommunicationCount, CommunicationFilter, CommunicationStore, RepoResult,
};
use rusqlite::{params, Connection, Row};

const COMMUNICATION_SELECT_SQL: &str = "SELECT
    c.id,
    r.owner_id,
    c.kind,
    c.occurred_on,
    c.subject,
    c.description,
    c.relationship_id,
    r.name AS relationship_name,
    c.created_at,
    c.updated_at
FROM communications c
JOIN relationships r ON r.id = c.relationship_id AND r.is_deleted = 0
WHERE c.is_deleted = 0";

const COMMUNICATION_COUNT_SQL: &str = "SELECT COUNT(*)
FROM communications c
JOIN relationships r ON r.id = c.relationship_id AND r.is_deleted = 0
WHERE c.is_deleted = 0";

pub struct SqliteCommunicationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommunicationStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Persists a communication and returns its storage id.
    ///
    /// `id`, `owner_id` and `relationship` on the input are ignored.
    pub fn insert(&self, record: &Communication) -> RepoResult<RecordId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO communications (
                relationship_id,
                kind,
                occurred_on,
                subject,
                description,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                record.relationship_id,
                communication_type_to_db(record.kind),
                record.occurred_on,
                record.subject.as_str(),
                record.description.as_str(),
                record.created_at,
                record.updated_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }
}

impl CommunicationStore for SqliteCommunicationStore<'_> {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Communication>> {
        let mut query = SelectQuery::new(COMMUNICATION_SELECT_SQL);
        query.filter("r.owner_id = ?", [owner_id]);
        if let Some(since) = since {
            query.filter("c.updated_at >= ?", [since]);
        }
        query
            .order_by("c.updated_at DESC, c.id DESC")
            .paginate(limit, 0);
        query.fetch(self.conn, parse_communication_row)
    }

    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &CommunicationFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Communication>> {
        let mut query = SelectQuery::new(COMMUNICATION_SELECT_SQL);
        query.filter("r.owner_id = ?", [owner_id]);
        if let Some(kind) = filter.kind {
            query.filter("c.kind = ?", [communication_type_to_db(kind).to_string()]);
        }
        if let Some(from) = filter.occurred_from {
            query.filter("c.occurred_on >= ?", [from]);
        }
        if let Some(to) = filter.occurred_to {
            query.filter("c.occurred_on <= ?", [to]);
        }
        if let Some(relationship_id) = filter.relationship_id {
            query.filter("c.relationship_id = ?", [relationship_id]);
        }
        query
            .order_by("c.occurred_on DESC, c.id DESC")
            .paginate(limit, offset);
        query.fetch(self.conn, parse_communication_row)
    }

    fn count(&self, owner_id: OwnerId, predicate: &CommunicationCount) -> RepoResult<i64> {
        let mut query = SelectQuery::new(COMMUNICATION_COUNT_SQL);
        query.filter("r.owner_id = ?", [owner_id]);
        match *predicate {
            CommunicationCount::All => {}
            CommunicationCount::OfType(kind) => {
                query.filter("c.kind = ?", [communication_type_to_db(kind).to_string()]);
            }
            CommunicationCount::OccurredSince(since) => {
                query.filter("c.occurred_on >= ?", [since]);
            }
        }
        query.count(self.conn)
    }
}

fn parse_communication_row(row: &Row<'_>) -> RepoResult<Communication> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_communication_type(&kind_text)
        .ok_or_else(|| invalid_enum("communications.kind", &kind_text))?;
    let relationship_id: RecordId = row.get("relationship_id")?;
    let relationship_name: String = row.get("relationship_name")?;

    Ok(Communication {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        kind,
        occurred_on: row.get("occurred_on")?,
        subject: row.get("subject")?,
        description: row.get("description")?,
        relationship_id,
        relationship: Some(RelatedRef::new(relationship_id, relationship_name)),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn communication_type_to_db(kind: CommunicationType) -> &'static str {
    match kind {
        CommunicationType::Email => "email",
        CommunicationType::Call => "call",
        CommunicationType::Meeting => "meeting",
        CommunicationType::Other => "other",
    }
}

fn parse_communication_type(value: &str) -> Option<CommunicationType> {
    match value {
        "email" => Some(CommunicationType::Email),
        "call" => Some(CommunicationType::Call),
        "meeting" => Some(CommunicationType::Meeting),
        "other" => Some(CommunicationType::Other),
        _ => None,
    }
}
