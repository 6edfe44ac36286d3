//! Inference data API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serveiq_common::{ApiError, InferenceRecord, RECENT_LIMIT};
use serveiq_db::DbError;
use tracing::error;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct ApiCount {
    pub count: u64,
}

/// Store failures collapse to a generic 500; the cause only goes to the log.
fn store_error(err: DbError) -> ApiError {
    match err {
        DbError::InvalidId(_) => ApiError::BadRequest("Invalid id".to_string()),
        other => {
            error!("Database error: {}", other);
            ApiError::Database
        }
    }
}

/// GET /api/data - Latest inferences, newest first
pub async fn list_recent_inferences(
    State(state): State<SharedState>,
) -> Result<Json<Vec<InferenceRecord>>, ApiError> {
    let records = state.store.recent(RECENT_LIMIT).await.map_err(store_error)?;
    Ok(Json(records))
}

/// GET /api/data/count - Number of stored inferences
pub async fn inference_count(
    State(state): State<SharedState>,
) -> Result<Json<ApiCount>, ApiError> {
    let count = state.store.count().await.map_err(store_error)?;
    Ok(Json(ApiCount { count }))
}

/// GET /api/data/{id} - One inference by id
pub async fn get_inference(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<InferenceRecord>, ApiError> {
    state
        .store
        .find_by_id(&id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}
