//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use wayfarer_chat::{ConversationalClient, SearchCompletionClient, ServiceConfig, ServiceKind};
use wayfarer_core::{Error, Result, WayfarerConfig};
use wayfarer_places::PlacesClient;
use wayfarer_resolve::DisplayAdapter;
use wayfarer_runtime::{prompts, GeneratedFiles, GenerationPipeline, GenerationRequest};
use wayfarer_store::DatasetStore;

/// Generation job status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub id: String,
    pub location: String,
    pub keyword: String,
    pub status: JobStatus,
    /// Progress messages, oldest first.
    pub progress: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<GeneratedFiles>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub queued_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// A queued generation.
pub struct GenerationTask {
    pub job_id: String,
    pub request: GenerationRequest,
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: WayfarerConfig,
    pub adapter: DisplayAdapter,
    pub services: ServiceConfig,
    /// `None` when a service credential is missing; browsing still works.
    pub pipeline: Option<GenerationPipeline>,
    pub jobs: RwLock<HashMap<String, GenerationJob>>,
    pub jobs_tx: mpsc::UnboundedSender<GenerationTask>,
    jobs_rx: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<GenerationTask>>>,
}

impl AppState {
    pub fn new(
        config: WayfarerConfig,
        store: DatasetStore,
        services: ServiceConfig,
        pipeline: Option<GenerationPipeline>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let adapter = DisplayAdapter::new(store, config.map);
        Self {
            config,
            adapter,
            services,
            pipeline,
            jobs: RwLock::new(HashMap::new()),
            jobs_tx: tx,
            jobs_rx: parking_lot::Mutex::new(Some(rx)),
        }
    }

    /// Open the store and build the real service clients from `config`.
    pub fn from_config(config: WayfarerConfig) -> Result<Self> {
        let store = DatasetStore::open(&config.data_paths.root)?;
        let services = ServiceConfig::load(&config.data_paths.services_file);
        let pipeline = match build_pipeline(&config, &services, store.clone()) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Generation disabled: {}", e);
                None
            }
        };
        Ok(Self::new(config, store, services, pipeline))
    }

    /// The generation pipeline, or a configuration error when it is unavailable.
    pub fn pipeline(&self) -> Result<&GenerationPipeline> {
        self.pipeline
            .as_ref()
            .ok_or_else(|| Error::Config("generation services are not configured".into()))
    }

    /// Take the job receiver (can only be called once, by the worker).
    pub fn take_jobs_rx(&self) -> Option<mpsc::UnboundedReceiver<GenerationTask>> {
        self.jobs_rx.lock().take()
    }

    /// Record a queued job and hand it to the worker. Returns the job id.
    pub fn enqueue(&self, request: GenerationRequest) -> Result<String> {
        let job_id = uuid::Uuid::new_v4().to_string();
        let job = GenerationJob {
            id: job_id.clone(),
            location: request.location.clone(),
            keyword: request.keyword.clone(),
            status: JobStatus::Queued,
            progress: Vec::new(),
            files: None,
            error: None,
            queued_at: now_millis(),
            started_at: None,
            completed_at: None,
        };
        self.jobs.write().insert(job_id.clone(), job);

        self.jobs_tx
            .send(GenerationTask {
                job_id: job_id.clone(),
                request,
            })
            .map_err(|_| Error::Config("generation worker is not running".into()))?;
        info!("Queued generation job {}", job_id);
        Ok(job_id)
    }

    /// Apply `update` to a job if it still exists.
    pub fn update_job(&self, job_id: &str, update: impl FnOnce(&mut GenerationJob)) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            update(job);
        }
    }
}

/// Real service clients wired into a pipeline.
pub fn build_pipeline(
    config: &WayfarerConfig,
    services: &ServiceConfig,
    store: DatasetStore,
) -> Result<GenerationPipeline> {
    let search = SearchCompletionClient::from_config(services)?;
    let conversational = ConversationalClient::from_config(services)?;
    let directory = PlacesClient::new(services.api_key(ServiceKind::Directory)?, services.timeout())?;
    let template = prompts::load_score_template(&config.data_paths.score_template_file);

    Ok(GenerationPipeline::new(
        Arc::new(search),
        Arc::new(conversational),
        Arc::new(directory),
        store,
    )
    .with_score_template(template))
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
