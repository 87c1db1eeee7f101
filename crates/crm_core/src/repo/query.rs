//! Dynamic SQL assembly shared by the SQLite stores.

use crate::repo::source::RepoResult;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

/// Incrementally built `SELECT` with positional bind values.
///
/// The base statement must end inside a `WHERE` clause so that `filter`
/// can append `AND` terms.
pub(crate) struct SelectQuery {
    sql: String,
    bind_values: Vec<Value>,
}

impl SelectQuery {
    pub(crate) fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            bind_values: Vec::new(),
        }
    }

    /// Appends `AND <clause>`; `clause` holds one `?` per bound value.
    pub(crate) fn filter<I>(&mut self, clause: &str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.sql.push_str(" AND ");
        self.sql.push_str(clause);
        self.bind_values.extend(values.into_iter().map(Into::into));
        self
    }

    pub(crate) fn order_by(&mut self, order: &str) -> &mut Self {
        self.sql.push_str(" ORDER BY ");
        self.sql.push_str(order);
        self
    }

    pub(crate) fn paginate(&mut self, limit: u32, offset: u32) -> &mut Self {
        self.sql.push_str(" LIMIT ?");
        self.bind_values.push(Value::Integer(i64::from(limit)));
        if offset > 0 {
            self.sql.push_str(" OFFSET ?");
            self.bind_values.push(Value::Integer(i64::from(offset)));
        }
        self
    }

    pub(crate) fn fetch<T>(
        &self,
        conn: &Connection,
        parse: impl Fn(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = conn.prepare(&self.sql)?;
        let mut rows = stmt.query(params_from_iter(self.bind_values.iter()))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }

    /// Runs a `SELECT COUNT(*)` statement.
    pub(crate) fn count(&self, conn: &Connection) -> RepoResult<i64> {
        let count = conn.query_row(
            &self.sql,
            params_from_iter(self.bind_values.iter()),
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count)
    }
}

pub(crate) fn like_pattern(needle: &str) -> String {
    format!("%{}%", needle.trim().to_lowercase())
}

pub(crate) fn invalid_enum(column: &str, value: &str) -> crate::repo::source::RepoError {
    crate::repo::source::RepoError::InvalidData(format!("invalid value `{value}` in {column}"))
}
