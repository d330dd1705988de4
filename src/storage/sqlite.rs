//! `SQLite` key-value backend.

use crate::error::{DefectError, Result};
use crate::storage::KeyValueStore;
use crate::storage::schema::apply_schema;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite-backed key-value store.
#[derive(Debug)]
pub struct SqliteKv {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteKv {
    /// Open (creating if needed) the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
        apply_schema(&conn)?;
        tracing::debug!(path = %path.display(), "Opened SQLite key-value store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn, path: None })
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(DefectError::storage)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(DefectError::storage)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.as_ref().map_or_else(
            || "sqlite::memory:".to_string(),
            |path| format!("sqlite:{}", path.display()),
        )
    }
}
