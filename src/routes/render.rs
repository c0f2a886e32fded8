//! Field rendering route
//!
//! Returns every annotatable field of a reading with its segment sequence
//! and escaped HTML, derived fresh from the current highlight set. The UI
//! only presents what comes back; it never matches text itself.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::annotations::store::HighlightStore;
use crate::error::Result;
use crate::readings::ReadingRepository;
use crate::render::{render_field, RenderedField};
use crate::state::AppState;

/// Create the render router, nested under `/:id/render`
pub fn router() -> Router<AppState> {
    Router::new().route("/:id/render", get(render_reading))
}

#[derive(Serialize)]
struct RenderResponse {
    reading_id: String,
    fields: Vec<RenderedField>,
}

/// Render all annotatable fields of a reading with highlights applied
async fn render_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RenderResponse>> {
    let reading = ReadingRepository::new(state.db()).get(&id).await?;
    let highlights = HighlightStore::new(state.db()).load(&id).await?;

    let fields = reading
        .annotated_fields()
        .into_iter()
        .map(|field| render_field(&field.path, &field.text, &highlights))
        .collect();

    Ok(Json(RenderResponse {
        reading_id: id,
        fields,
    }))
}
