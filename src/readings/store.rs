//! Reading persistence
//!
//! Readings are stored as one row each; list-shaped fields (key terms,
//! arguments) are kept as JSON columns, stored as supplied by the Analysis
//! Service. Deleting a reading removes its highlight set in the same
//! transaction so no orphaned annotation data survives.

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::types::{Argument, KeyTerm, Reading};
use crate::error::{AppError, Result};

/// Ingestion request posted by the Analysis Service
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    pub week_number: i64,
    pub title: String,
    pub filename: String,
    pub author: Option<String>,
    #[serde(default)]
    pub thesis: String,
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub historical_context: String,
    #[serde(default)]
    pub historiography: String,
    pub significance: Option<String>,
}

/// Row shape for the readings table; JSON columns are expanded on read
#[derive(sqlx::FromRow)]
struct ReadingRow {
    id: String,
    week_number: i64,
    title: String,
    filename: String,
    author: Option<String>,
    thesis: String,
    key_terms: String,
    arguments: String,
    historical_context: String,
    historiography: String,
    significance: Option<String>,
    created_at: String,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = AppError;

    fn try_from(row: ReadingRow) -> Result<Reading> {
        Ok(Reading {
            id: row.id,
            week_number: row.week_number,
            title: row.title,
            filename: row.filename,
            author: row.author,
            thesis: row.thesis,
            key_terms: serde_json::from_str(&row.key_terms)?,
            arguments: serde_json::from_str(&row.arguments)?,
            historical_context: row.historical_context,
            historiography: row.historiography,
            significance: row.significance,
            created_at: row.created_at,
        })
    }
}

const SELECT_READING: &str = r#"
    SELECT id, week_number, title, filename, author, thesis, key_terms,
           arguments, historical_context, historiography, significance,
           created_at
    FROM readings
"#;

/// Reading repository
pub struct ReadingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReadingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Ingest a completed analysis, assigning id and creation time.
    ///
    /// Week numbers outside 1-13 are rejected (the course runs 13 weeks).
    pub async fn ingest(&self, data: &NewReading) -> Result<Reading> {
        if !(1..=13).contains(&data.week_number) {
            return Err(AppError::BadRequest(format!(
                "week_number must be between 1 and 13, got {}",
                data.week_number
            )));
        }

        let reading = Reading {
            id: Uuid::new_v4().to_string(),
            week_number: data.week_number,
            title: data.title.clone(),
            filename: data.filename.clone(),
            author: data.author.clone(),
            thesis: data.thesis.clone(),
            key_terms: data.key_terms.clone(),
            arguments: data.arguments.clone(),
            historical_context: data.historical_context.clone(),
            historiography: data.historiography.clone(),
            significance: data.significance.clone(),
            created_at: Utc::now().to_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO readings (id, week_number, title, filename, author,
                                  thesis, key_terms, arguments,
                                  historical_context, historiography,
                                  significance, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reading.id)
        .bind(reading.week_number)
        .bind(&reading.title)
        .bind(&reading.filename)
        .bind(&reading.author)
        .bind(&reading.thesis)
        .bind(serde_json::to_string(&reading.key_terms)?)
        .bind(serde_json::to_string(&reading.arguments)?)
        .bind(&reading.historical_context)
        .bind(&reading.historiography)
        .bind(&reading.significance)
        .bind(&reading.created_at)
        .execute(self.pool)
        .await?;

        tracing::info!(
            reading_id = %reading.id,
            week = reading.week_number,
            title = %reading.title,
            "ingested reading"
        );

        Ok(reading)
    }

    /// List readings, optionally filtered by week, newest first.
    pub async fn list(&self, week: Option<i64>) -> Result<Vec<Reading>> {
        let rows: Vec<ReadingRow> = match week {
            Some(week) => {
                sqlx::query_as(&format!(
                    "{} WHERE week_number = ? ORDER BY created_at DESC",
                    SELECT_READING
                ))
                .bind(week)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "{} ORDER BY week_number ASC, created_at DESC",
                    SELECT_READING
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(Reading::try_from).collect()
    }

    /// Get a reading by id.
    pub async fn get(&self, id: &str) -> Result<Reading> {
        let row: Option<ReadingRow> =
            sqlx::query_as(&format!("{} WHERE id = ?", SELECT_READING))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => Reading::try_from(row),
            None => Err(AppError::NotFound(format!("Reading not found: {}", id))),
        }
    }

    /// Delete a reading and its highlight set in one transaction.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM readings WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reading not found: {}", id)));
        }

        sqlx::query("DELETE FROM highlight_sets WHERE reading_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(reading_id = %id, "deleted reading and its highlights");
        Ok(())
    }
}
