//! Axum router: maps all URL paths to handlers.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    data::{get_inference, inference_count, list_recent_inferences},
    system::health,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // API endpoints
        .route("/api/data",       get(list_recent_inferences))
        .route("/api/data/count", get(inference_count))
        .route("/api/data/{id}",  get(get_inference))

        .route("/health", get(health))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
