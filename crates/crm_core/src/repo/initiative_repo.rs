//! SQLite-backed initiative store.

use crate::model::entity::{Initiative, InitiativeStatus, OwnerId, RecordId};
use crate::repo::query::{invalid_enum, SelectQuery};
use crate::repo::source::{InitiativeCount, InitiativeFilter, InitiativeStore, RepoResult};
use crate::repo::work_item_repo::resolve_ref;
use rusqlite::{params, Connection, Row};

const INITIATIVE_SELECT_SQL: &str = "SELECT
    p.id,
    p.owner_id,
    p.name,
    p.description,
    p.status,
    p.client_id,
    r.name AS client_name,
    p.created_at,
    p.updated_at
FROM initiatives p
LEFT JOIN relationships r ON r.id = p.client_id AND r.is_deleted = 0
WHERE p.is_deleted = 0";

const INITIATIVE_COUNT_SQL: &str = "SELECT COUNT(*) FROM initiatives p WHERE p.is_deleted = 0";

pub struct SqliteInitiativeStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInitiativeStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Persists an initiative and returns its storage id.
    pub fn insert(&self, record: &Initiative) -> RepoResult<RecordId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO initiatives (
                owner_id,
                client_id,
                name,
                description,
                status,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                record.owner_id,
                record.client.as_ref().map(|client| client.id),
                record.name.as_str(),
                record.description.as_str(),
                initiative_status_to_db(record.status),
                record.created_at,
                record.updated_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }
}

impl InitiativeStore for SqliteInitiativeStore<'_> {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<Initiative>> {
        let mut query = SelectQuery::new(INITIATIVE_SELECT_SQL);
        query.filter("p.owner_id = ?", [owner_id]);
        if let Some(since) = since {
            query.filter("p.updated_at >= ?", [since]);
        }
        query
            .order_by("p.updated_at DESC, p.id DESC")
            .paginate(limit, 0);
        query.fetch(self.conn, parse_initiative_row)
    }

    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &InitiativeFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Initiative>> {
        let mut query = SelectQuery::new(INITIATIVE_SELECT_SQL);
        query.filter("p.owner_id = ?", [owner_id]);
        if let Some(status) = filter.status {
            query.filter("p.status = ?", [initiative_status_to_db(status).to_string()]);
        }
        if let Some(client_id) = filter.client_id {
            query.filter("p.client_id = ?", [client_id]);
        }
        query
            .order_by("p.created_at DESC, p.id DESC")
            .paginate(limit, offset);
        query.fetch(self.conn, parse_initiative_row)
    }

    fn count(&self, owner_id: OwnerId, predicate: &InitiativeCount) -> RepoResult<i64> {
        let mut query = SelectQuery::new(INITIATIVE_COUNT_SQL);
        query.filter("p.owner_id = ?", [owner_id]);
        match *predicate {
            InitiativeCount::All => {}
            InitiativeCount::WithStatus(status) => {
                query.filter("p.status = ?", [initiative_status_to_db(status).to_string()]);
            }
            InitiativeCount::CreatedSince(since) => {
                query.filter("p.created_at >= ?", [since]);
            }
        }
        query.count(self.conn)
    }
}

fn parse_initiative_row(row: &Row<'_>) -> RepoResult<Initiative> {
    let status_text: String = row.get("status")?;
    let status = parse_initiative_status(&status_text)
        .ok_or_else(|| invalid_enum("initiatives.status", &status_text))?;

    Ok(Initiative {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        status,
        client: resolve_ref(row.get("client_id")?, row.get("client_name")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn initiative_status_to_db(status: InitiativeStatus) -> &'static str {
    match status {
        InitiativeStatus::InProgress => "in_progress",
        InitiativeStatus::Completed => "completed",
        InitiativeStatus::Cancelled => "cancelled",
    }
}

fn parse_initiative_status(value: &str) -> Option<InitiativeStatus> {
    match value {
        "in_progress" => Some(InitiativeStatus::InProgress),
        "completed" => Some(InitiativeStatus::Completed),
        "cancelled" => Some(InitiativeStatus::Cancelled),
        _ => None,
    }
}
