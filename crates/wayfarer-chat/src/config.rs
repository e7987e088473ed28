//! External service configuration persistence and credential lookup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use wayfarer_core::{Error, Result};

use crate::types::{ServiceKind, ServiceStatus};

pub const DEFAULT_SEARCH_MODEL: &str = "sonar";
pub const DEFAULT_CONVERSATIONAL_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Stored service configuration (persisted to services.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub perplexity_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
    #[serde(default = "default_search_model")]
    pub search_model: String,
    #[serde(default = "default_conversational_model")]
    pub conversational_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_search_model() -> String {
    DEFAULT_SEARCH_MODEL.into()
}
fn default_conversational_model() -> String {
    DEFAULT_CONVERSATIONAL_MODEL.into()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            perplexity_api_key: None,
            anthropic_api_key: None,
            google_maps_api_key: None,
            search_model: DEFAULT_SEARCH_MODEL.into(),
            conversational_model: DEFAULT_CONVERSATIONAL_MODEL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            config_path: PathBuf::new(),
        }
    }
}

impl ServiceConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: ServiceConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        // Env vars as fallback for API keys
        if config.perplexity_api_key.is_none() {
            config.perplexity_api_key = non_empty_env("PERPLEXITY_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = non_empty_env("ANTHROPIC_API_KEY");
        }
        if config.google_maps_api_key.is_none() {
            config.google_maps_api_key = non_empty_env("GOOGLE_MAPS_API_KEY");
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved service config to {}", self.config_path.display());
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// API key for a service, or a configuration error naming the variable.
    pub fn api_key(&self, service: ServiceKind) -> Result<&str> {
        let (key, var) = match service {
            ServiceKind::Search => (&self.perplexity_api_key, "PERPLEXITY_API_KEY"),
            ServiceKind::Conversational => (&self.anthropic_api_key, "ANTHROPIC_API_KEY"),
            ServiceKind::Directory => (&self.google_maps_api_key, "GOOGLE_MAPS_API_KEY"),
        };
        key.as_deref()
            .ok_or_else(|| Error::Config(format!("{} not set ({} service)", var, service)))
    }

    /// Build the public status response (no API keys exposed).
    pub fn to_status(&self) -> ServiceStatus {
        ServiceStatus {
            search_configured: self.perplexity_api_key.is_some(),
            conversational_configured: self.anthropic_api_key.is_some(),
            directory_configured: self.google_maps_api_key.is_some(),
            search_model: self.search_model.clone(),
            conversational_model: self.conversational_model.clone(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
