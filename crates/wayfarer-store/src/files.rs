//! Dataset file store: canonical writes, tolerant reads, listing.
//!
//! Writes are whole-file overwrites in the canonical spelling. Reads try the
//! canonical spelling and then the legacy ones; a candidate that cannot be
//! read or parsed (e.g. truncated by a crash mid-write) is skipped.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use wayfarer_core::slug::display_name;
use wayfarer_core::{DatasetId, FileFamily, Result};

use crate::types::{CountryProfile, LocationCollection, RatingsDocument};

/// A document read from disk together with the file name it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub file_name: String,
    pub value: T,
}

/// JSON dataset files in one data directory.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        debug!("Dataset store at {}", root.display());
        Ok(Self { root })
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Write a document under the canonical name for `family`. Returns the file name.
    pub fn write<T: Serialize>(&self, id: &DatasetId, family: FileFamily, value: &T) -> Result<String> {
        let file_name = id.file_name(family);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path_of(&file_name), json)?;
        info!("Saved {} data to {}", family, file_name);
        Ok(file_name)
    }

    pub fn save_country(&self, id: &DatasetId, profile: &CountryProfile) -> Result<String> {
        self.write(id, FileFamily::Country, profile)
    }

    pub fn save_locations(&self, id: &DatasetId, locations: &LocationCollection) -> Result<String> {
        self.write(id, FileFamily::Locations, locations)
    }

    pub fn save_ratings(&self, id: &DatasetId, ratings: &RatingsDocument) -> Result<String> {
        self.write(id, FileFamily::Ratings, ratings)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// First candidate spelling of `family` that exists and parses.
    pub fn read<T: DeserializeOwned>(&self, id: &DatasetId, family: FileFamily) -> Option<Loaded<T>> {
        for file_name in id.candidate_file_names(family) {
            let path = self.path_of(&file_name);
            if !path.is_file() {
                continue;
            }
            let data = match std::fs::read_to_string(&path) {
                Ok(d) => d,
                Err(e) => {
                    warn!("Error reading {}: {}", file_name, e);
                    continue;
                }
            };
            match serde_json::from_str::<T>(&data) {
                Ok(value) => {
                    debug!("Found {} data: {}", family, file_name);
                    return Some(Loaded { file_name, value });
                }
                Err(e) => warn!("Error parsing {}: {}", file_name, e),
            }
        }
        None
    }

    pub fn load_country(&self, id: &DatasetId) -> Option<Loaded<CountryProfile>> {
        self.read(id, FileFamily::Country)
    }

    pub fn load_locations(&self, id: &DatasetId) -> Option<Loaded<LocationCollection>> {
        self.read(id, FileFamily::Locations)
    }

    pub fn load_ratings(&self, id: &DatasetId) -> Option<Loaded<RatingsDocument>> {
        self.read(id, FileFamily::Ratings)
    }

    // ---------------------------------------------------------------
    // Listing
    // ---------------------------------------------------------------

    /// Display names of every dataset with a country file, sorted and de-duplicated.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        for entry in std::fs::read_dir(&self.root)?.flatten() {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if let Some(name) = dataset_name_from_file(&file_name) {
                names.insert(name);
            }
        }
        Ok(names.into_iter().collect())
    }
}

/// `country_sri_lanka.json` / `country-sri-lanka.json` → `Sri Lanka`.
/// Template files and non-country files yield `None`.
fn dataset_name_from_file(file_name: &str) -> Option<String> {
    let stem = file_name
        .strip_prefix(FileFamily::Country.prefix())?
        .strip_suffix(".json")?;
    let stem = stem.strip_prefix(&['_', '-'][..]).unwrap_or(stem);
    let name = display_name(stem);
    if name.is_empty() || name.to_lowercase().contains("template") {
        return None;
    }
    Some(name)
}
