//! Highlights API routes
//!
//! CRUD over one reading's highlight set. Deletion is idempotent: removing
//! an id that is already gone still returns 204, so a double-tapped delete
//! in the UI cannot surface an error.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};

use crate::annotations::store::{CreateHighlight, HighlightStore, UpdateNote};
use crate::annotations::types::Highlight;
use crate::error::Result;
use crate::readings::ReadingRepository;
use crate::state::AppState;

/// Create the highlights router, nested under `/:id/highlights`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/highlights", get(list_highlights))
        .route("/:id/highlights", post(create_highlight))
        .route("/:id/highlights/:highlight_id", patch(update_note))
        .route("/:id/highlights/:highlight_id", delete(delete_highlight))
}

/// List a reading's highlights in insertion order
async fn list_highlights(
    State(state): State<AppState>,
    Path(reading_id): Path<String>,
) -> Result<Json<Vec<Highlight>>> {
    let store = HighlightStore::new(state.db());
    let highlights = store.list(&reading_id).await?;
    Ok(Json(highlights))
}

/// Create a highlight from a captured selection
async fn create_highlight(
    State(state): State<AppState>,
    Path(reading_id): Path<String>,
    Json(data): Json<CreateHighlight>,
) -> Result<(StatusCode, Json<Highlight>)> {
    // A highlight set belongs to exactly one reading; never persist one
    // for a reading that does not exist
    ReadingRepository::new(state.db()).get(&reading_id).await?;

    let store = HighlightStore::new(state.db());
    let highlight = store.create(&reading_id, &data).await?;
    Ok((StatusCode::CREATED, Json(highlight)))
}

/// Update a highlight's note
async fn update_note(
    State(state): State<AppState>,
    Path((reading_id, highlight_id)): Path<(String, String)>,
    Json(data): Json<UpdateNote>,
) -> Result<Json<Highlight>> {
    let store = HighlightStore::new(state.db());
    let highlight = store
        .update_note(&reading_id, &highlight_id, &data.note)
        .await?;
    Ok(Json(highlight))
}

/// Delete a highlight (idempotent)
async fn delete_highlight(
    State(state): State<AppState>,
    Path((reading_id, highlight_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let store = HighlightStore::new(state.db());
    store.delete(&reading_id, &highlight_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
