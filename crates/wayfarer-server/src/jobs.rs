//! Background generation queue: runs one generation at a time.

use std::sync::Arc;

use tracing::{error, info};

use crate::state::{now_millis, AppState, GenerationTask, JobStatus};

/// Finished jobs kept for status polling.
const MAX_FINISHED_JOBS: usize = 100;

/// Start the background generation worker task.
pub fn start_generation_worker(state: Arc<AppState>) {
    let mut rx = match state.take_jobs_rx() {
        Some(rx) => rx,
        None => {
            error!("Generation worker already started");
            return;
        }
    };

    tokio::spawn(async move {
        info!("Background generation worker started");
        while let Some(task) = rx.recv().await {
            process_generation_job(&state, task).await;
        }
    });
}

pub async fn process_generation_job(state: &AppState, task: GenerationTask) {
    let GenerationTask { job_id, request } = task;
    state.update_job(&job_id, |job| {
        job.status = JobStatus::Processing;
        job.started_at = Some(now_millis());
    });
    info!(
        "Processing generation job {}: {} / {}",
        job_id, request.location, request.keyword
    );

    let result = match state.pipeline() {
        Ok(pipeline) => {
            pipeline
                .generate(&request, |p| {
                    let message = p.message();
                    state.update_job(&job_id, |job| job.progress.push(message));
                })
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(files) => {
            info!("Generation job {} completed", job_id);
            state.update_job(&job_id, |job| {
                job.status = JobStatus::Completed;
                job.files = Some(files);
                job.completed_at = Some(now_millis());
            });
        }
        Err(e) => {
            error!("Generation job {} failed: {}", job_id, e);
            state.update_job(&job_id, |job| {
                job.status = JobStatus::Failed;
                job.error = Some(e.to_string());
                job.completed_at = Some(now_millis());
            });
        }
    }

    cleanup_old_jobs(state);
}

fn cleanup_old_jobs(state: &AppState) {
    let mut jobs = state.jobs.write();
    let mut finished: Vec<(String, i64)> = jobs
        .values()
        .filter(|j| matches!(j.status, JobStatus::Completed | JobStatus::Failed))
        .map(|j| (j.id.clone(), j.completed_at.unwrap_or(j.queued_at)))
        .collect();

    if finished.len() > MAX_FINISHED_JOBS {
        finished.sort_by_key(|(_, t)| *t);
        let remove_count = finished.len() - MAX_FINISHED_JOBS;
        for (id, _) in finished.into_iter().take(remove_count) {
            jobs.remove(&id);
        }
    }
}
