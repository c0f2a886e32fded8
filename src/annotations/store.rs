//! SQLite-backed highlight persistence
//!
//! Each reading owns exactly one row in `highlight_sets`, holding the
//! serialized ordered highlight array. Every mutation rewrites the whole
//! payload in a single upsert, so the persisted set is always complete and
//! the write is finished before the mutating call returns.

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use super::types::{set_is_well_formed, Highlight, HighlightColor};
use crate::error::{AppError, Result};

/// Create highlight request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHighlight {
    /// The exact selected substring; stored verbatim
    pub text: String,
    pub color: Option<HighlightColor>,
}

/// Note update request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNote {
    pub note: String,
}

/// Highlight store for one SQLite pool
///
/// All operations are keyed by reading id; a reading with no row simply has
/// an empty set.
pub struct HighlightStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> HighlightStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the persisted highlight set for a reading.
    ///
    /// An absent row, unparsable payload, or a payload violating the set
    /// invariants all yield an empty set. Corruption is logged, never
    /// surfaced: losing annotations must not block the reading itself.
    pub async fn load(&self, reading_id: &str) -> Result<Vec<Highlight>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM highlight_sets WHERE reading_id = ?")
                .bind(reading_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(match row {
            Some((payload,)) => parse_payload(reading_id, &payload),
            None => Vec::new(),
        })
    }

    /// List highlights for a reading in insertion order.
    ///
    /// Insertion order is the creation-order tie-break the renderer uses
    /// when assigning occurrences.
    pub async fn list(&self, reading_id: &str) -> Result<Vec<Highlight>> {
        self.load(reading_id).await
    }

    /// Create a new highlight from a captured selection and persist the set.
    ///
    /// Rejects text that is empty or whitespace-only after trimming; the
    /// stored text is the exact selected substring, untrimmed.
    pub async fn create(&self, reading_id: &str, data: &CreateHighlight) -> Result<Highlight> {
        if data.text.trim().is_empty() {
            return Err(AppError::InvalidSelection(
                "selected text is empty or whitespace-only".to_string(),
            ));
        }

        let mut set = self.load(reading_id).await?;
        let highlight = Highlight::new(data.text.clone(), data.color.unwrap_or_default());
        set.push(highlight.clone());
        self.persist(reading_id, &set).await?;

        tracing::debug!(
            reading_id = %reading_id,
            highlight_id = %highlight.id,
            "created highlight"
        );

        Ok(highlight)
    }

    /// Update the note of an existing highlight.
    ///
    /// `text` and `color` are immutable; only the note changes.
    pub async fn update_note(
        &self,
        reading_id: &str,
        id: &str,
        note: &str,
    ) -> Result<Highlight> {
        let mut set = self.load(reading_id).await?;

        let Some(highlight) = set.iter_mut().find(|h| h.id == id) else {
            return Err(AppError::NotFound(format!("Highlight not found: {}", id)));
        };
        highlight.note = note.to_string();
        let updated = highlight.clone();

        self.persist(reading_id, &set).await?;
        Ok(updated)
    }

    /// Delete a highlight. Deleting an id that is already absent is a no-op.
    pub async fn delete(&self, reading_id: &str, id: &str) -> Result<()> {
        let mut set = self.load(reading_id).await?;
        let before = set.len();
        set.retain(|h| h.id != id);

        if set.len() == before {
            tracing::debug!(
                reading_id = %reading_id,
                highlight_id = %id,
                "delete of absent highlight, nothing to do"
            );
            return Ok(());
        }

        self.persist(reading_id, &set).await
    }

    /// Remove the whole persisted set for a reading (used when the owning
    /// reading is deleted).
    pub async fn delete_for_reading(&self, reading_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM highlight_sets WHERE reading_id = ?")
            .bind(reading_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Rewrite the full payload for a reading.
    async fn persist(&self, reading_id: &str, set: &[Highlight]) -> Result<()> {
        let payload = serde_json::to_string(set)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO highlight_sets (reading_id, payload, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(reading_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(reading_id)
        .bind(&payload)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

/// Parse a stored payload, falling back to an empty set on any defect.
fn parse_payload(reading_id: &str, payload: &str) -> Vec<Highlight> {
    match serde_json::from_str::<Vec<Highlight>>(payload) {
        Ok(set) if set_is_well_formed(&set) => set,
        Ok(_) => {
            tracing::warn!(
                reading_id = %reading_id,
                "stored highlight set violates invariants, treating as empty"
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(
                reading_id = %reading_id,
                error = %e,
                "corrupt highlight payload, treating as empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;

    // One connection: a pooled `:memory:` database is per-connection
    async fn setup_test_db() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    fn create_req(text: &str) -> CreateHighlight {
        CreateHighlight {
            text: text.to_string(),
            color: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_in_insertion_order() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        let h1 = store.create("r1", &create_req("first")).await.unwrap();
        let h2 = store.create("r1", &create_req("second")).await.unwrap();

        let set = store.list("r1").await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].id, h1.id);
        assert_eq!(set[1].id, h2.id);
        assert_eq!(set[0].color, HighlightColor::Yellow);
    }

    #[tokio::test]
    async fn test_create_rejects_whitespace_selection() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        let err = store.create("r1", &create_req("   \n\t")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
        assert!(store.list("r1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_set() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        let mut created = Vec::new();
        for text in ["alpha", "beta", "gamma"] {
            created.push(store.create("r1", &create_req(text)).await.unwrap());
        }
        store
            .update_note("r1", &created[1].id, "a note")
            .await
            .unwrap();
        created[1].note = "a note".to_string();

        let loaded = store.load("r1").await.unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_update_note_leaves_text_and_color() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        let h = store
            .create(
                "r1",
                &CreateHighlight {
                    text: "span".to_string(),
                    color: Some(HighlightColor::Pink),
                },
            )
            .await
            .unwrap();

        let updated = store.update_note("r1", &h.id, "remember this").await.unwrap();
        assert_eq!(updated.note, "remember this");
        assert_eq!(updated.text, "span");
        assert_eq!(updated.color, HighlightColor::Pink);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        store.create("r1", &create_req("span")).await.unwrap();
        let err = store
            .update_note("r1", "missing", "note")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        let h = store.create("r1", &create_req("span")).await.unwrap();
        store.delete("r1", &h.id).await.unwrap();
        assert!(store.list("r1").await.unwrap().is_empty());

        // Second delete of the same id: no error
        store.delete("r1", &h.id).await.unwrap();
        store.delete("r1", "never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_sets_are_scoped_per_reading() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        store.create("r1", &create_req("only in r1")).await.unwrap();
        assert!(store.list("r2").await.unwrap().is_empty());

        store.delete_for_reading("r1").await.unwrap();
        assert!(store.list("r1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_payload_recovers_to_empty() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        sqlx::query(
            "INSERT INTO highlight_sets (reading_id, payload, updated_at) VALUES (?, ?, ?)",
        )
        .bind("r1")
        .bind("not-an-array")
        .bind("2026-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .unwrap();

        assert!(store.load("r1").await.unwrap().is_empty());

        // A fresh create still succeeds and replaces the corrupt payload
        let h = store.create("r1", &create_req("recovered")).await.unwrap();
        let set = store.load("r1").await.unwrap();
        assert_eq!(set, vec![h]);
    }

    #[tokio::test]
    async fn test_payload_violating_invariants_treated_as_empty() {
        let pool = setup_test_db().await;
        let store = HighlightStore::new(&pool);

        // Well-formed JSON, but duplicate ids
        let payload = r#"[{"id":"h1","text":"a"},{"id":"h1","text":"b"}]"#;
        sqlx::query(
            "INSERT INTO highlight_sets (reading_id, payload, updated_at) VALUES (?, ?, ?)",
        )
        .bind("r1")
        .bind(payload)
        .bind("2026-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .unwrap();

        assert!(store.load("r1").await.unwrap().is_empty());
    }
}
