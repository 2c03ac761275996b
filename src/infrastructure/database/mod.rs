use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Result as SqliteResult, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::application::errors::StorageError;
use crate::domain::entities::{CommandLogEntry, CommandStatus, LogId};
use crate::domain::traits::CommandLogStore;

/// SQLite-backed command log.
///
/// The connection sits behind a mutex, so writes from concurrent dispatches are
/// serialized here. Queries run on the blocking thread pool.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> SqliteResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> SqliteResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqliteResult<Self> {
        init_tables(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StorageError::Task("database lock poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

fn init_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS command_logs (
            id TEXT PRIMARY KEY,
            command TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            timestamp TEXT NOT NULL,
            details TEXT NOT NULL DEFAULT '',
            sender TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_command_logs_timestamp ON command_logs(timestamp)",
        [],
    )?;

    Ok(())
}

/// Fixed-width UTC timestamps sort lexicographically
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(index: usize, e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, e.into())
}

fn row_to_entry(row: &Row<'_>) -> SqliteResult<CommandLogEntry> {
    let id: String = row.get(0)?;
    let status: String = row.get(2)?;
    let timestamp: String = row.get(3)?;

    Ok(CommandLogEntry {
        id: LogId::parse_str(&id).map_err(|e| conversion_error(0, e))?,
        command: row.get(1)?,
        status: status.parse::<CommandStatus>().map_err(|e| conversion_error(2, e))?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| conversion_error(3, e))?
            .with_timezone(&Utc),
        details: row.get(4)?,
        sender: row.get(5)?,
    })
}

#[async_trait]
impl CommandLogStore for Database {
    async fn insert(&self, entry: &CommandLogEntry) -> Result<LogId, StorageError> {
        let entry = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO command_logs (id, command, status, timestamp, details, sender)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    entry.id.to_string(),
                    entry.command,
                    entry.status.as_str(),
                    format_timestamp(&entry.timestamp),
                    entry.details,
                    entry.sender,
                ],
            )?;
            Ok(entry.id)
        })
        .await
    }

    async fn update_by_id(&self, id: LogId, status: CommandStatus, details: &str) -> Result<(), StorageError> {
        let details = details.to_string();
        self.with_conn(move |conn| {
            let rows = conn.execute(
                "UPDATE command_logs SET status = ?1, details = ?2 WHERE id = ?3",
                rusqlite::params![status.as_str(), details, id.to_string()],
            )?;
            if rows == 0 {
                return Err(StorageError::NotFound(id.to_string()));
            }
            Ok(())
        })
        .await
    }

    async fn query_recent(&self, limit: usize) -> Result<Vec<CommandLogEntry>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, command, status, timestamp, details, sender FROM command_logs
                 ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
            )?;

            let rows = stmt.query_map([limit], row_to_entry)?;

            let mut entries = Vec::new();
            for entry in rows {
                entries.push(entry?);
            }
            Ok(entries)
        })
        .await
    }
}
