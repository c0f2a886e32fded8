//! Readings API routes
//!
//! The upstream contract: the Analysis Service posts completed analyses,
//! the UI lists and fetches them. Deleting a reading also removes its
//! highlight set.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::readings::{NewReading, Reading, ReadingRepository};
use crate::state::AppState;

/// Create the readings router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_readings))
        .route("/", post(ingest_reading))
        .route("/:id", get(get_reading))
        .route("/:id", delete(delete_reading))
}

#[derive(Deserialize)]
struct ListQuery {
    week: Option<i64>,
}

/// List readings, optionally filtered by week
async fn list_readings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Reading>>> {
    let repo = ReadingRepository::new(state.db());
    let readings = repo.list(query.week).await?;
    Ok(Json(readings))
}

/// Ingest a completed analysis
async fn ingest_reading(
    State(state): State<AppState>,
    Json(data): Json<NewReading>,
) -> Result<(StatusCode, Json<Reading>)> {
    let repo = ReadingRepository::new(state.db());
    let reading = repo.ingest(&data).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

/// Get a specific reading
async fn get_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reading>> {
    let repo = ReadingRepository::new(state.db());
    let reading = repo.get(&id).await?;
    Ok(Json(reading))
}

/// Delete a reading and its highlights
async fn delete_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let repo = ReadingRepository::new(state.db());
    repo.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
