//! Database schema for the `SQLite` key-value backend.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema. One row per storage key; the value is the
/// whole serialized collection.
pub const SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Apply the schema and stamp the schema version.
///
/// # Errors
///
/// Returns an error if the schema cannot be applied.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    Ok(())
}
