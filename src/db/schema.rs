//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Readings table (analyzed records supplied by the Analysis Service)
CREATE TABLE IF NOT EXISTS readings (
    id TEXT PRIMARY KEY,
    week_number INTEGER NOT NULL,
    title TEXT NOT NULL,
    filename TEXT NOT NULL,
    author TEXT,
    thesis TEXT NOT NULL DEFAULT '',
    -- JSON arrays, stored as supplied by the Analysis Service
    key_terms TEXT NOT NULL DEFAULT '[]',
    arguments TEXT NOT NULL DEFAULT '[]',
    historical_context TEXT NOT NULL DEFAULT '',
    historiography TEXT NOT NULL DEFAULT '',
    significance TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_readings_week ON readings(week_number);
CREATE INDEX IF NOT EXISTS idx_readings_created ON readings(created_at);

-- Highlight sets: one row per reading holding the serialized ordered
-- highlight array. The whole payload is rewritten on every mutation so a
-- reader never observes a partial set.
CREATE TABLE IF NOT EXISTS highlight_sets (
    reading_id TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
