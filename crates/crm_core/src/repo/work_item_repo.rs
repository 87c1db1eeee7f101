//! SQLite-backed work item store.
//!
//! # Invariants
//! - Listing order is priority (`high` first), then earliest due date, with
//!   undated items last.
//! - A tombstoned association resolves to `None`.

use crate::model::entity::{
    OwnerId, Priority, RecordId, RelatedRef, WorkItem, WorkItemStatus,
};
use crate::repo::query::{invalid_enum, SelectQuery};
use crate::repo::source::{RepoResult, WorkItemCount, WorkItemFilter, WorkItemStore};
use rusqlite::{params, Connection, Row};

const WORK_ITEM_SELECT_SQL: &str = "SELECT
    w.id,
    w.owner_id,
    w.title,
    w.description,
    w.due_at,
    w.priority,
    w.status,
    w.relationship_id,
    r.name AS relationship_name,
    w.initiative_id,
    i.name AS initiative_name,
    w.created_at,
    w.updated_at
FROM work_items w
LEFT JOIN relationships r ON r.id = w.relationship_id AND r.is_deleted = 0
LEFT JOIN initiatives i ON i.id = w.initiative_id AND i.is_deleted = 0
WHERE w.is_deleted = 0";

const WORK_ITEM_COUNT_SQL: &str = "SELECT COUNT(*) FROM work_items w WHERE w.is_deleted = 0";

const WORK_ITEM_PRIORITY_ORDER: &str = "CASE w.priority
        WHEN 'high' THEN 1
        WHEN 'medium' THEN 2
        ELSE 3
    END,
    w.due_at IS NULL,
    w.due_at ASC,
    w.id ASC";

pub struct SqliteWorkItemStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkItemStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Persists a work item and returns its storage id.
    ///
    /// Only the ids of `relationship` and `initiative` are stored.
    pub fn insert(&self, record: &WorkItem) -> RepoResult<RecordId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO work_items (
                owner_id,
                relationship_id,
                initiative_id,
                title,
                description,
                due_at,
                priority,
                status,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                record.owner_id,
                record.relationship.as_ref().map(|related| related.id),
                record.initiative.as_ref().map(|related| related.id),
                record.title.as_str(),
                record.description.as_str(),
                record.due_at,
                priority_to_db(record.priority),
                work_item_status_to_db(record.status),
                record.created_at,
                record.updated_at,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }
}

impl WorkItemStore for SqliteWorkItemStore<'_> {
    fn list_recent(
        &self,
        owner_id: OwnerId,
        since: Option<i64>,
        limit: u32,
    ) -> RepoResult<Vec<WorkItem>> {
        let mut query = SelectQuery::new(WORK_ITEM_SELECT_SQL);
        query.filter("w.owner_id = ?", [owner_id]);
        if let Some(since) = since {
            query.filter("w.updated_at >= ?", [since]);
        }
        query
            .order_by("w.updated_at DESC, w.id DESC")
            .paginate(limit, 0);
        query.fetch(self.conn, parse_work_item_row)
    }

    fn list_by_owner(
        &self,
        owner_id: OwnerId,
        filter: &WorkItemFilter,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<WorkItem>> {
        let mut query = SelectQuery::new(WORK_ITEM_SELECT_SQL);
        query.filter("w.owner_id = ?", [owner_id]);
        if let Some(status) = filter.status {
            query.filter("w.status = ?", [work_item_status_to_db(status).to_string()]);
        }
        if let Some(priority) = filter.priority {
            query.filter("w.priority = ?", [priority_to_db(priority).to_string()]);
        }
        if let Some(relationship_id) = filter.relationship_id {
            query.filter("w.relationship_id = ?", [relationship_id]);
        }
        if let Some(initiative_id) = filter.initiative_id {
            query.filter("w.initiative_id = ?", [initiative_id]);
        }
        if let Some(due_before) = filter.due_before {
            query.filter("w.due_at <= ?", [due_before]);
        }
        if let Some(due_after) = filter.due_after {
            query.filter("w.due_at >= ?", [due_after]);
        }
        query
            .order_by(WORK_ITEM_PRIORITY_ORDER)
            .paginate(limit, offset);
        query.fetch(self.conn, parse_work_item_row)
    }

    fn count(&self, owner_id: OwnerId, predicate: &WorkItemCount) -> RepoResult<i64> {
        let mut query = SelectQuery::new(WORK_ITEM_COUNT_SQL);
        query.filter("w.owner_id = ?", [owner_id]);
        match *predicate {
            WorkItemCount::All => {}
            WorkItemCount::WithStatus(status) => {
                query.filter("w.status = ?", [work_item_status_to_db(status).to_string()]);
            }
            WorkItemCount::OverdueAt(now) => {
                query
                    .filter(
                        "w.status = ?",
                        [work_item_status_to_db(WorkItemStatus::Pending).to_string()],
                    )
                    .filter("w.due_at IS NOT NULL AND w.due_at < ?", [now]);
            }
            WorkItemCount::CreatedSince(since) => {
                query.filter("w.created_at >= ?", [since]);
            }
        }
        query.count(self.conn)
    }
}

fn parse_work_item_row(row: &Row<'_>) -> RepoResult<WorkItem> {
    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text)
        .ok_or_else(|| invalid_enum("work_items.priority", &priority_text))?;
    let status_text: String = row.get("status")?;
    let status = parse_work_item_status(&status_text)
        .ok_or_else(|| invalid_enum("work_items.status", &status_text))?;

    Ok(WorkItem {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_at: row.get("due_at")?,
        priority,
        status,
        relationship: resolve_ref(row.get("relationship_id")?, row.get("relationship_name")?),
        initiative: resolve_ref(row.get("initiative_id")?, row.get("initiative_name")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn resolve_ref(id: Option<RecordId>, name: Option<String>) -> Option<RelatedRef> {
    match (id, name) {
        (Some(id), Some(name)) => Some(RelatedRef::new(id, name)),
        _ => None,
    }
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}

pub(crate) fn work_item_status_to_db(status: WorkItemStatus) -> &'static str {
    match status {
        WorkItemStatus::Pending => "pending",
        WorkItemStatus::Completed => "completed",
    }
}

fn parse_work_item_status(value: &str) -> Option<WorkItemStatus> {
    match value {
        "pending" => Some(WorkItemStatus::Pending),
        "completed" => Some(WorkItemStatus::Completed),
        _ => None,
    }
}
