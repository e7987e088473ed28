//! Dataset browsing and ratings routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use wayfarer_core::DatasetId;
use wayfarer_resolve::UnifiedView;
use wayfarer_store::RatingsDocument;

use super::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/datasets", get(list_datasets))
        .route("/datasets/{name}", get(get_dataset))
        .route("/datasets/{name}/ratings", post(generate_ratings))
}

/// GET /api/datasets: names of all stored datasets.
async fn list_datasets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let datasets = state.adapter.list()?;
    Ok(Json(serde_json::json!({ "datasets": datasets })))
}

/// GET /api/datasets/:name: unified view of one dataset.
async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<UnifiedView>, ApiError> {
    let view = state.adapter.require(&DatasetId::from_display(&name))?;
    Ok(Json(view))
}

/// POST /api/datasets/:name/ratings: generate and save detailed ratings.
async fn generate_ratings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RatingsDocument>, ApiError> {
    let pipeline = state.pipeline()?;
    let ratings = pipeline.deepen(&DatasetId::from_display(&name)).await?;
    Ok(Json(ratings))
}
