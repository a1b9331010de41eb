/*!
# Database Schema Management

Complete schema for a challenge catalog: the record store, the master index
that lists registered challenges in registration order, and version tracking.
*/

use crate::DbResult;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Current database schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize database with complete schema
pub fn initialize_database(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- One row per challenge definition
        CREATE TABLE challenges (
            identifier TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            difficulty TEXT NOT NULL,
            category TEXT NOT NULL,
            question TEXT NOT NULL,
            answer_kind TEXT NOT NULL,
            answers TEXT NOT NULL, -- JSON array of strings
            hint TEXT,
            rewards TEXT NOT NULL, -- JSON array of reward entries
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Master index: registered challenges in registration order
        CREATE TABLE master_index (
            position INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT NOT NULL UNIQUE,
            added_at INTEGER NOT NULL,
            FOREIGN KEY (identifier) REFERENCES challenges(identifier)
        );

        CREATE INDEX idx_challenges_difficulty ON challenges(difficulty);
        CREATE INDEX idx_challenges_category ON challenges(category);

        -- Schema version tracking
        CREATE TABLE schema_version (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        params![SCHEMA_VERSION, Utc::now().timestamp()],
    )?;

    Ok(())
}

/// Check if database is properly initialized
pub fn check_schema(conn: &Connection) -> DbResult<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='master_index'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(found.is_some())
}

/// Get current schema version from database
pub fn get_schema_version(conn: &Connection) -> DbResult<Option<i32>> {
    let table_exists: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    if table_exists.is_none() {
        return Ok(None);
    }

    let version = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(version)
}
