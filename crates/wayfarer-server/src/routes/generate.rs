//! Generation submission and job status routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use wayfarer_core::Error;
use wayfarer_runtime::GenerationRequest;

use super::ApiError;
use crate::state::{AppState, GenerationJob};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(submit_generation))
        .route("/jobs", get(get_jobs))
        .route("/jobs/{job_id}", get(get_job))
}

/// POST /api/generate: validate and queue a generation.
async fn submit_generation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    state.pipeline()?;
    let job_id = state.enqueue(request)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "jobId": job_id })),
    ))
}

/// GET /api/jobs: all known jobs, newest first.
async fn get_jobs(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let jobs = state.jobs.read();
    let mut all_jobs: Vec<&GenerationJob> = jobs.values().collect();
    all_jobs.sort_by(|a, b| b.queued_at.cmp(&a.queued_at));

    Json(serde_json::json!({
        "jobs": all_jobs,
        "total": all_jobs.len(),
    }))
}

/// GET /api/jobs/:jobId: a single job.
async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<GenerationJob>, ApiError> {
    let job = state
        .jobs
        .read()
        .get(&job_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("job '{}'", job_id)))?;
    Ok(Json(job))
}
