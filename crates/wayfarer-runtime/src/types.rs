//! Runtime types.

use serde::{Deserialize, Serialize};
use wayfarer_core::{Error, Result};
use wayfarer_store::{CountryProfile, LocationCollection};

pub const MIN_RADIUS_KM: u32 = 1;
pub const MAX_RADIUS_KM: u32 = 500;
pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 20;

fn default_radius() -> u32 {
    50
}

fn default_results() -> usize {
    10
}

/// Parameters of one dataset generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Main location, e.g. `Ella`.
    pub location: String,
    /// Focus keyword, e.g. `hiking`.
    pub keyword: String,
    #[serde(default = "default_radius")]
    pub radius_km: u32,
    #[serde(default = "default_results")]
    pub results: usize,
}

impl GenerationRequest {
    pub fn new(
        location: impl Into<String>,
        keyword: impl Into<String>,
        radius_km: u32,
        results: usize,
    ) -> Result<Self> {
        let request = Self {
            location: location.into().trim().to_string(),
            keyword: keyword.into().trim().to_string(),
            radius_km,
            results,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check ranges and required fields. Requests deserialized from JSON
    /// bypass [`new`](Self::new) and must be validated explicitly.
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(Error::InvalidRequest("location is required".into()));
        }
        if self.keyword.trim().is_empty() {
            return Err(Error::InvalidRequest("keyword is required".into()));
        }
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&self.radius_km) {
            return Err(Error::InvalidRequest(format!(
                "radius must be between {} and {} km, got {}",
                MIN_RADIUS_KM, MAX_RADIUS_KM, self.radius_km
            )));
        }
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&self.results) {
            return Err(Error::InvalidRequest(format!(
                "results must be between {} and {}, got {}",
                MIN_RESULTS, MAX_RESULTS, self.results
            )));
        }
        Ok(())
    }
}

/// Pipeline stage, used to label failures and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Profile and candidate locations from the search service.
    Identify,
    /// Directory lookup of every candidate.
    Enrich,
    /// Writing the dataset files.
    Persist,
    /// Detailed ratings from the conversational service.
    Deepen,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Identify => "identify",
            Stage::Enrich => "enrich",
            Stage::Persist => "persist",
            Stage::Deepen => "deepen",
        };
        f.write_str(name)
    }
}

/// File names written by a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFiles {
    pub country_file: String,
    pub locations_file: String,
}

/// Intermediate results reported while a generation runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progress {
    /// Identify finished.
    CountryProfile { profile: CountryProfile },
    /// Enrich finished.
    Locations {
        found: usize,
        candidates: usize,
        locations: LocationCollection,
    },
    /// Persist finished.
    Saved { files: GeneratedFiles },
}

impl Progress {
    pub fn stage(&self) -> Stage {
        match self {
            Progress::CountryProfile { .. } => Stage::Identify,
            Progress::Locations { .. } => Stage::Enrich,
            Progress::Saved { .. } => Stage::Persist,
        }
    }

    /// One-line summary for status displays.
    pub fn message(&self) -> String {
        match self {
            Progress::CountryProfile { profile } => {
                let name = if profile.location.name.is_empty() {
                    "location"
                } else {
                    profile.location.name.as_str()
                };
                format!("Profile ready for {}", name)
            }
            Progress::Locations {
                found, candidates, ..
            } => format!("Found {} of {} locations", found, candidates),
            Progress::Saved { files } => {
                format!("Saved {} and {}", files.country_file, files.locations_file)
            }
        }
    }
}
