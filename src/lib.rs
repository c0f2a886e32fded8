//! Marginalia Server Library
//!
//! Annotation service for analyzed readings. The library holds the whole
//! engine so integration tests and benches drive the same code as the
//! binary:
//!
//! - `readings`: analyzed records supplied by the Analysis Service
//! - `annotations`: highlight model, store, selection capture, note editor,
//!   and the per-reading session
//! - `render`: segment derivation and escaped HTML emission
//! - `routes`: the axum HTTP surface over the above

pub mod annotations;
pub mod config;
pub mod db;
pub mod error;
pub mod readings;
pub mod render;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Assemble the application router.
///
/// Used by both the binary and the integration tests, so the app under
/// test is exactly the app that serves.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/health", routes::health::router())
        .nest(
            "/api/readings",
            routes::readings::router()
                .merge(routes::render::router())
                .merge(routes::highlights::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
