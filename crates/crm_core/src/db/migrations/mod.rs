//! Versioned schema steps for the CRM store.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - All pending steps commit in one transaction or not at all.
//! - The last applied step is recorded in `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "entity_tables",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "activity_indexes",
        sql: include_str!("0002_activity_indexes.sql"),
    },
];

/// Schema version produced by running every known step.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   binary.
/// - `DbError::Migration` naming the step whose SQL failed; nothing from the
///   run is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending = pending_after(from_version);
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        let script = format!("{}\nPRAGMA user_version = {};", step.sql, step.version);
        tx.execute_batch(&script)
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}

fn pending_after(version: u32) -> &'static [Migration] {
    let applied = MIGRATIONS
        .iter()
        .take_while(|migration| migration.version <= version)
        .count();
    &MIGRATIONS[applied..]
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
