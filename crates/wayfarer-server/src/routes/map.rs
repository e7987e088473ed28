//! Map configuration route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/map/config", get(get_map_config))
}

/// GET /api/map/config: default viewport and which services are configured.
async fn get_map_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let map = &state.config.map;
    Json(serde_json::json!({
        "center": { "lat": map.center_lat, "lng": map.center_lng },
        "zoom": map.zoom,
        "services": state.services.to_status(),
        "generationEnabled": state.pipeline.is_some(),
    }))
}
