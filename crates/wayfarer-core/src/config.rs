//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all Wayfarer data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory holding the `country_*`, `locations_*` and
    /// `ratings_*` dataset files (e.g., `data/`).
    pub root: PathBuf,
    /// Prompt template overrides (`data/templates/`).
    pub templates: PathBuf,
    /// Ratings skeleton override (`data/templates/score_template.json`).
    pub score_template_file: PathBuf,
    /// External service configuration (`data/services.json`).
    pub services_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let templates = root.join("templates");
        let paths = Self {
            score_template_file: templates.join("score_template.json"),
            services_file: root.join("services.json"),
            templates,
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }
}

/// Initial map viewport used when a dataset has no locations to frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapDefaults {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            center_lat: 7.8731,
            center_lng: 80.7718,
            zoom: 8,
        }
    }
}

/// Top-level Wayfarer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WayfarerConfig {
    /// HTTP API port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub map: MapDefaults,
}

impl WayfarerConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        let mut map = MapDefaults::default();
        if let Some(lat) = env_f64("WAYFARER_MAP_LAT") {
            map.center_lat = lat;
        }
        if let Some(lng) = env_f64("WAYFARER_MAP_LNG") {
            map.center_lng = lng;
        }

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            map,
        })
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
