//! Durable `SQLite` adapter.
//!
//! One `logs` document table, WAL mode, covering indexes on the filterable
//! columns. The adapter owns the two defensive duties of the durable
//! contract: `details`/`metadata` are sanitized recursively before a write,
//! and stored timestamps are parsed leniently on the way out; a malformed
//! value is repaired with the current instant instead of failing the read.
//!
//! The free-text `search` predicate is applied in-process after the SQL
//! fetch; `count` runs the structured predicates only. See
//! [`tally_core::LogStorage`] for the contract this preserves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use serde_json::{Map, Value};
use tracing::warn;

use tally_core::sanitize::{parse_timestamp_lossy, sanitize_map};
use tally_core::{
    ANONYMOUS_USER, EntryId, LogCategory, LogEntry, LogFilter, LogLevel, LogMetadata, LogStorage,
    Page, Result, StorageError, UserId,
};

use crate::schema;

/// Rows removed per [`LogStorage::cleanup`] call; callers loop until 0.
pub const CLEANUP_BATCH: usize = 500;

/// Durable log store backed by a `SQLite` document table.
pub struct SqliteLogStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteLogStore {
    /// Open or create a store at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Backend(format!("create dir: {e}")))?;
        }
        let conn = Connection::open(path).map_err(db_err)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: path.to_owned(),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        })
    }

    /// Filesystem path of the backing database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(schema::PRAGMAS)
        .map_err(|e| StorageError::Backend(format!("pragmas: {e}")))?;
    conn.execute_batch(schema::CREATE_TABLES)
        .map_err(|e| StorageError::Backend(format!("schema: {e}")))?;
    Ok(())
}

fn db_err(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// Fixed-width RFC 3339 so lexicographic comparison in SQL matches
/// chronological order.
fn format_ts(ts: chrono::DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Append the structured predicates to a `WHERE 1=1` query.
fn push_filters(
    sql: &mut String,
    params: &mut Vec<Box<dyn rusqlite::types::ToSql>>,
    filter: &LogFilter,
) {
    if let Some(level) = filter.level {
        sql.push_str(" AND level = ?");
        params.push(Box::new(level.as_str()));
    }
    if let Some(category) = filter.category {
        sql.push_str(" AND category = ?");
        params.push(Box::new(category.as_str()));
    }
    if let Some(ref user) = filter.user_id {
        sql.push_str(" AND user_id = ?");
        params.push(Box::new(user.as_str().to_owned()));
    }
    if let Some(start) = filter.start {
        sql.push_str(" AND timestamp >= ?");
        params.push(Box::new(format_ts(start)));
    }
    if let Some(end) = filter.end {
        sql.push_str(" AND timestamp <= ?");
        params.push(Box::new(format_ts(end)));
    }
}

/// Map a row to a [`LogEntry`], repairing what it can instead of failing.
fn row_to_entry(row: &rusqlite::Row<'_>) -> LogEntry {
    let id: String = row.get(0).unwrap_or_default();
    let raw_ts: rusqlite::types::Value = row
        .get(1)
        .unwrap_or(rusqlite::types::Value::Null);
    let level: String = row.get(2).unwrap_or_default();
    let category: String = row.get(3).unwrap_or_default();
    let action: String = row.get(4).unwrap_or_default();
    let message: String = row.get(5).unwrap_or_default();
    let user_id: String = row.get(6).unwrap_or_else(|_| ANONYMOUS_USER.to_owned());
    let details: Option<String> = row.get(7).unwrap_or(None);
    let metadata: Option<String> = row.get(8).unwrap_or(None);

    LogEntry {
        id: EntryId::from(id),
        timestamp: parse_timestamp_lossy(&column_to_json(raw_ts)),
        level: LogLevel::from_str_lossy(&level),
        category: LogCategory::from_str_lossy(&category),
        action,
        message,
        user_id: (user_id != ANONYMOUS_USER).then(|| UserId::from(user_id)),
        details: details.map_or_else(Map::new, |raw| parse_details(&raw)),
        metadata: metadata.map_or_else(LogMetadata::default, |raw| parse_metadata(&raw)),
    }
}

fn parse_details(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!("corrupt details column, defaulting to empty");
            Map::new()
        }
    }
}

fn parse_metadata(raw: &str) -> LogMetadata {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(error = %e, "corrupt metadata column, defaulting to empty");
        LogMetadata::default()
    })
}

fn column_to_json(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Text(s) => Value::String(s),
        rusqlite::types::Value::Integer(i) => Value::Number(i.into()),
        rusqlite::types::Value::Real(f) => {
            serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
        }
        _ => Value::Null,
    }
}

#[async_trait]
impl LogStorage for SqliteLogStore {
    async fn write(&self, entry: &LogEntry) -> Result<()> {
        let details = sanitize_map(&entry.details);
        let details_json = if details.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&Value::Object(details))?)
        };
        let metadata_json = match serde_json::to_value(&entry.metadata)? {
            Value::Object(map) if map.is_empty() => None,
            Value::Object(map) => Some(serde_json::to_string(&Value::Object(sanitize_map(&map)))?),
            _ => None,
        };
        let user_id = entry
            .user_id
            .as_ref()
            .map_or(ANONYMOUS_USER, UserId::as_str);

        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO logs (id, timestamp, level, level_num, category, action, message, user_id, details, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                entry.id.as_str(),
                format_ts(entry.timestamp),
                entry.level.as_str(),
                entry.level.as_num(),
                entry.category.as_str(),
                entry.action,
                entry.message,
                user_id,
                details_json,
                metadata_json,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::DuplicateId(entry.id.to_string()))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn read(&self, filter: &LogFilter, page: &Page) -> Result<Vec<LogEntry>> {
        let mut sql = String::from(
            "SELECT id, timestamp, level, category, action, message, user_id, details, metadata
             FROM logs WHERE 1=1",
        );
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        push_filters(&mut sql, &mut params, filter);
        sql.push_str(" ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Box::new(page.limit as i64));
        params.push(Box::new(page.offset as i64));

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(AsRef::as_ref).collect();
        let rows = stmt
            .query_map(param_refs.as_slice(), |row| Ok(row_to_entry(row)))
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;

        // Search narrows the fetched page; rows matching it beyond the
        // window are not pulled in to backfill.
        Ok(rows
            .into_iter()
            .filter(|e| filter.matches_search(e))
            .collect())
    }

    async fn count(&self, filter: &LogFilter) -> Result<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM logs WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        push_filters(&mut sql, &mut params, filter);

        let conn = self.conn.lock();
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            params.iter().map(AsRef::as_ref).collect();
        let count: i64 = conn
            .query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(db_err)?;
        #[allow(clippy::cast_sign_loss)]
        Ok(count as u64)
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        let conn = self.conn.lock();
        // Zero rows affected is fine: delete is idempotent.
        let _ = conn
            .execute("DELETE FROM logs WHERE id = ?1", [id.as_str()])
            .map_err(db_err)?;
        Ok(())
    }

    async fn cleanup(&self, retention_days: u32) -> Result<u64> {
        let cutoff = format_ts(Utc::now() - Duration::days(i64::from(retention_days)));
        let conn = self.conn.lock();
        let removed = conn
            .execute(
                "DELETE FROM logs WHERE id IN
                 (SELECT id FROM logs WHERE timestamp < ?1 ORDER BY timestamp ASC LIMIT ?2)",
                rusqlite::params![cutoff, CLEANUP_BATCH as i64],
            )
            .map_err(db_err)?;
        Ok(removed as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
