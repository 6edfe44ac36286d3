//! Service health.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serveiq_db::ConnectionState;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct ApiHealth {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health - Reports the startup handshake; runs no query.
pub async fn health(State(state): State<SharedState>) -> (StatusCode, Json<ApiHealth>) {
    let database = state.connection.as_str();
    match state.connection {
        ConnectionState::Connected => (StatusCode::OK, Json(ApiHealth { status: "ok", database })),
        ConnectionState::Failed(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiHealth { status: "degraded", database }),
        ),
    }
}
