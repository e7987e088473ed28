//! Generation pipeline: identify, enrich, persist, deepen.
//!
//! A generation asks the search service for a country profile and a list of
//! candidate locations, verifies each candidate against the place directory,
//! and writes the survivors to the dataset store. Deepen is a separate step
//! that asks the conversational service for detailed ratings.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use wayfarer_chat::CompletionClient;
use wayfarer_core::{DatasetId, Error, Result};
use wayfarer_places::{PlaceDetails, PlaceDirectory};
use wayfarer_store::{
    Coords, CountryProfile, DatasetStore, LocationCollection, LocationRecord, PriceLevel,
    RatingsDocument, TotalScore,
};

use crate::extract::extract_fenced_json;
use crate::prompts;
use crate::types::{GeneratedFiles, GenerationRequest, Progress, Stage};

/// Runs generations against explicit service clients and a store.
#[derive(Clone)]
pub struct GenerationPipeline {
    search: Arc<dyn CompletionClient>,
    conversational: Arc<dyn CompletionClient>,
    directory: Arc<dyn PlaceDirectory>,
    store: DatasetStore,
    score_template: Value,
}

impl GenerationPipeline {
    pub fn new(
        search: Arc<dyn CompletionClient>,
        conversational: Arc<dyn CompletionClient>,
        directory: Arc<dyn PlaceDirectory>,
        store: DatasetStore,
    ) -> Self {
        Self {
            search,
            conversational,
            directory,
            store,
            score_template: prompts::builtin_score_template(),
        }
    }

    /// Use `template` as the ratings skeleton.
    pub fn with_score_template(mut self, template: Value) -> Self {
        self.score_template = template;
        self
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Run Identify, Enrich and Persist for `request`.
    ///
    /// `progress` is called once after each stage. A failing stage aborts the
    /// run; files already written stay on disk.
    pub async fn generate<F>(&self, request: &GenerationRequest, progress: F) -> Result<GeneratedFiles>
    where
        F: Fn(Progress) + Send + Sync,
    {
        request.validate()?;
        let id = DatasetId::for_generation(&request.location, &request.keyword);
        info!(
            "Generating dataset '{}' ({} km, {} results)",
            id, request.radius_km, request.results
        );

        info!("Stage {}: identifying locations", Stage::Identify);
        let (profile, candidates) = self
            .identify(request)
            .await
            .map_err(|e| e.in_stage(Stage::Identify))?;
        progress(Progress::CountryProfile {
            profile: profile.clone(),
        });

        info!("Stage {}: verifying {} candidates", Stage::Enrich, candidates.len());
        let candidate_count = candidates.len();
        let locations = self
            .enrich(candidates)
            .await
            .map_err(|e| e.in_stage(Stage::Enrich))?;
        progress(Progress::Locations {
            found: locations.len(),
            candidates: candidate_count,
            locations: locations.clone(),
        });

        info!("Stage {}: saving dataset", Stage::Persist);
        let files = self
            .persist(&id, &profile, &locations)
            .map_err(|e| e.in_stage(Stage::Persist))?;
        progress(Progress::Saved {
            files: files.clone(),
        });

        info!("Dataset '{}' generated", id);
        Ok(files)
    }

    /// Country profile and candidate locations from the search service.
    pub async fn identify(
        &self,
        request: &GenerationRequest,
    ) -> Result<(CountryProfile, LocationCollection)> {
        let country_prompt = prompts::country_prompt(&request.location, &request.keyword);
        let locations_prompt = prompts::locations_prompt(
            &request.location,
            &request.keyword,
            request.radius_km,
            request.results,
        );

        let (country_raw, locations_raw) = tokio::try_join!(
            self.search.complete(&country_prompt),
            self.search.complete(&locations_prompt),
        )?;
        debug!("Country response: {}", country_raw);
        debug!("Locations response: {}", locations_raw);

        let mut profile: CountryProfile = decode(extract_fenced_json(&country_raw)?, "country profile")?;
        reconcile_total(&mut profile);

        let mut candidates: LocationCollection =
            decode(extract_fenced_json(&locations_raw)?, "locations")?;
        if candidates.len() > request.results {
            info!(
                "Model returned {} candidates, keeping the first {}",
                candidates.len(),
                request.results
            );
            candidates.recommended_locations.truncate(request.results);
        }

        Ok((profile, candidates))
    }

    /// Verify every candidate against the directory. Candidates the directory
    /// does not know are dropped; a directory failure aborts.
    pub async fn enrich(&self, candidates: LocationCollection) -> Result<LocationCollection> {
        let mut verified = Vec::with_capacity(candidates.len());
        for mut candidate in candidates.recommended_locations {
            match self.directory.lookup(&candidate.name, &candidate.region).await? {
                Some(details) => {
                    debug!("Verified {} as {}", candidate.name, details.place_id);
                    apply_details(&mut candidate, details);
                    verified.push(candidate);
                }
                None => warn!("Skipping location {} - details not found", candidate.name),
            }
        }
        Ok(LocationCollection {
            recommended_locations: verified,
        })
    }

    fn persist(
        &self,
        id: &DatasetId,
        profile: &CountryProfile,
        locations: &LocationCollection,
    ) -> Result<GeneratedFiles> {
        Ok(GeneratedFiles {
            country_file: self.store.save_country(id, profile)?,
            locations_file: self.store.save_locations(id, locations)?,
        })
    }

    /// Detailed ratings for `location_name` from the conversational service.
    pub async fn generate_ratings(&self, location_name: &str, summary: &str) -> Result<RatingsDocument> {
        self.ratings_for(location_name, summary)
            .await
            .map_err(|e| e.in_stage(Stage::Deepen))
    }

    async fn ratings_for(&self, location_name: &str, summary: &str) -> Result<RatingsDocument> {
        info!("Generating ratings for {}", location_name);
        let prompt = prompts::ratings_prompt(location_name, summary, &self.score_template);
        let response = self.conversational.complete(&prompt).await?;
        debug!("Ratings response: {}", response);

        let value = extract_fenced_json(&response)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Validation("ratings data is not an object".into()))?;
        if !object.contains_key("scores") {
            return Err(Error::Validation(
                "ratings data missing 'scores' section".into(),
            ));
        }
        decode(value, "ratings")
    }

    /// Generate ratings for a stored dataset and save them next to it.
    pub async fn deepen(&self, id: &DatasetId) -> Result<RatingsDocument> {
        let profile = self
            .store
            .load_country(id)
            .ok_or_else(|| Error::NotFound(format!("dataset '{}'", id)))?
            .value;

        let name = if profile.location.name.is_empty() {
            id.display.clone()
        } else {
            profile.location.name.clone()
        };
        let ratings = self
            .generate_ratings(&name, &profile.summary.overall_notes)
            .await?;
        self.store
            .save_ratings(id, &ratings)
            .map_err(|e| e.in_stage(Stage::Deepen))?;
        Ok(ratings)
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Validation(format!("unexpected {} shape: {}", what, e)))
}

/// Replace the model's total with the sum of the scores when all of them are bare numbers.
fn reconcile_total(profile: &mut CountryProfile) {
    if let Some(sum) = profile.flat_score_total() {
        let model_total = profile.summary.total_score.as_ref().and_then(TotalScore::value);
        if model_total != Some(sum) {
            info!(
                "Model total {:?} differs from score sum {}, using the sum",
                profile.summary.total_score, sum
            );
        }
        profile.summary.total_score = Some(TotalScore::Value(sum));
    }
}

fn apply_details(record: &mut LocationRecord, details: PlaceDetails) {
    record.coords = Coords {
        lat: details.lat,
        lng: details.lng,
    };
    record.formatted_address = details.formatted_address;
    record.place_id = details.place_id;
    record.photo_url = details.photo_url;
    record.rating = details.rating;
    record.user_ratings_total = details.user_ratings_total;
    record.business_status = details.business_status;
    record.price_level = details.price_level.map(PriceLevel::Label);
}
