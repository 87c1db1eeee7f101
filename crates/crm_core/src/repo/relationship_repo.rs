//! SQLite-backed relationship store.

use crate::model::entity::{OwnerId, RecordId, Relationship, RelationshipType};
use crate::repo::query::{invalid_enum, like_pattern, SelectQuery};
use crate::repo::source::{
    RelationshipCount, RelationshipFilter, RelationshipOrder, RelationshipStore, RepoResult,
};
use rusqlite::{params, Connection, Row};

const RELATIONSHIP_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    name,
    email,
    phone,
    company,
    position,
    kind,
    notes,
    created_at,
    updated_at
FROM relationships
WHERE is_deleted = 0";

const RELATIONSHIP_COUNT_SQL: &str = "SELECT COUNT(*) FROM relationships WHERE is_deleted = 0";

pub struct SqliteRelationshipStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationshipStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Persists a relationship and returns its storage id.
    pub fn insert(&self, record: &Relationship) -> RepoResult<RecordId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO relationships (
                owner_id,
                name,
                email,
                phone,
                company,
                position,
                kind,
                notes,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                record.owner_id,
                record.name.as_str(),
                record.email.as_str(),
                record.phone.as_str(),
                record.company.as_str(),
                record.position.as_str(),
                relationship_type_to_db(record.kind),
                record.notes.as_str(),
                record.created_at,
                record.updated_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }
}

impl RelationshipStore for SqliteRelationshipStore<'_> {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Relationship>> {
        let mut query = SelectQuery::new(RELATIONSHIP_SELECT_SQL);
        query.filter("owner_id = ?", [owner_id]);
        if let Some(since) = since {
            query.filter("updated_at >= ?", [since]);
        }
        query.order_by("updated_at DESC, id DESC").paginate(limit, 0);
        query.fetch(self.conn, parse_relationship_row)
    }

    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &RelationshipFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Relationship>> {
        let mut query = SelectQuery::new(RELATIONSHIP_SELECT_SQL);
        query.filter("owner_id = ?", [owner_id]);
        if let Some(kind) = filter.kind {
            query.filter("kind = ?", [relationship_type_to_db(kind).to_string()]);
        }
        if let Some(search) = filter.search.as_deref().filter(|value| !value.trim().is_empty()) {
            let pattern = like_pattern(search);
            query.filter(
                "(LOWER(name) LIKE ? OR LOWER(email) LIKE ? OR LOWER(company) LIKE ?)",
                [pattern.clone(), pattern.clone(), pattern],
            );
        }
        match filter.order {
            RelationshipOrder::Name => query.order_by("name COLLATE NOCASE ASC, id ASC"),
            RelationshipOrder::RecentlyUpdated => query.order_by("updated_at DESC, id DESC"),
        };
        query.paginate(limit, offset);
        query.fetch(self.conn, parse_relationship_row)
    }

    fn count(&self, owner_id: OwnerId, predicate: &RelationshipCount) -> RepoResult<i64> {
        let mut query = SelectQuery::new(RELATIONSHIP_COUNT_SQL);
        query.filter("owner_id = ?", [owner_id]);
        match *predicate {
            RelationshipCount::All => {}
            RelationshipCount::OfType(kind) => {
                query.filter("kind = ?", [relationship_type_to_db(kind).to_string()]);
            }
            RelationshipCount::CreatedSince(since) => {
                query.filter("created_at >= ?", [since]);
            }
        }
        query.count(self.conn)
    }
}

fn parse_relationship_row(row: &Row<'_>) -> RepoResult<Relationship> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_relationship_type(&kind_text)
        .ok_or_else(|| invalid_enum("relationships.kind", &kind_text))?;

    Ok(Relationship {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        company: row.get("company")?,
        position: row.get("position")?,
        kind,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn relationship_type_to_db(kind: RelationshipType) -> &'static str {
    match kind {
        RelationshipType::Client => "client",
        RelationshipType::Lead => "lead",
    }
}

fn parse_relationship_type(value: &str) -> Option<RelationshipType> {
    match value {
        "client" => Some(RelationshipType::Client),
        "lead" => Some(RelationshipType::Lead),
        _ => None,
    }
}
