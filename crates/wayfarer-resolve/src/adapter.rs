//! Display adapter: assembles a [`UnifiedView`] from the dataset files.

use tracing::{debug, warn};
use wayfarer_core::{DatasetId, MapDefaults, Result};
use wayfarer_store::DatasetStore;

use crate::types::{
    total_text, CategoryScore, LocationRow, MapCenter, SourceFiles, SummaryView, UnifiedView,
    CATEGORY_MAX,
};

/// Read-only view over a dataset store.
#[derive(Debug, Clone)]
pub struct DisplayAdapter {
    store: DatasetStore,
    map: MapDefaults,
}

impl DisplayAdapter {
    pub fn new(store: DatasetStore, map: MapDefaults) -> Self {
        Self { store, map }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Names of every dataset that has a country file.
    pub fn list(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    /// Build the view for `id`. `None` unless both the profile and the
    /// locations file are found.
    pub fn load(&self, id: &DatasetId) -> Option<UnifiedView> {
        if id.is_empty() {
            warn!("Dataset name '{}' has nothing to look up", id.display);
            return None;
        }
        let country = self.store.load_country(id);
        let locations = self.store.load_locations(id);

        let (country, locations) = match (country, locations) {
            (Some(c), Some(l)) => (c, l),
            (c, l) => {
                if c.is_none() {
                    warn!("No country data found for {}", id);
                }
                if l.is_none() {
                    warn!("No locations data found for {}", id);
                }
                return None;
            }
        };

        let ratings = self.store.load_ratings(id);
        let profile = country.value;
        let score_source = match &ratings {
            Some(r) => {
                debug!("Using ratings from {} for {}", r.file_name, id);
                &r.value.scores
            }
            None => &profile.scores,
        };
        let scores: Vec<CategoryScore> = score_source
            .iter()
            .map(|(key, entry)| CategoryScore::new(key, entry))
            .collect();

        let rows: Vec<LocationRow> = locations
            .value
            .recommended_locations
            .iter()
            .map(LocationRow::from)
            .collect();

        let summary = profile.summary;
        Some(UnifiedView {
            name: id.display.clone(),
            location: profile.location,
            max_score: CATEGORY_MAX * scores.len() as f64,
            scores,
            summary: SummaryView {
                total_display: total_text(summary.total_score.as_ref()),
                total_score: summary.total_score.as_ref().and_then(|t| t.value()),
                strengths: summary.strengths,
                weaknesses: summary.weaknesses,
                overall_notes: summary.overall_notes,
            },
            map_center: MapCenter::of(&rows, &self.map),
            locations: rows,
            ratings_applied: ratings.is_some(),
            sources: SourceFiles {
                country: country.file_name,
                locations: locations.file_name,
                ratings: ratings.map(|r| r.file_name),
            },
        })
    }

    /// Like [`load`](Self::load) but a missing dataset is an error.
    pub fn require(&self, id: &DatasetId) -> Result<UnifiedView> {
        self.load(id)
            .ok_or_else(|| wayfarer_core::Error::NotFound(format!("dataset '{}'", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> (DisplayAdapter, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        (DisplayAdapter::new(store, MapDefaults::default()), dir)
    }

    fn write(adapter: &DisplayAdapter, name: &str, json: &str) {
        std::fs::write(adapter.store().path_of(name), json).unwrap();
    }

    const PROFILE: &str = r#"{
        "location": {"name": "Sri Lanka", "region": "South Asia", "country": "Sri Lanka"},
        "scores": {"safety": 7, "culture": 9, "living_costs": 8},
        "summary": {"total_score": 24, "strengths": ["Food"], "weaknesses": ["Roads"], "overall_notes": "Lush island"}
    }"#;

    const LOCATIONS: &str = r#"{"recommended_locations": [
        {"name": "Sigiriya", "region": "Central", "coords": {"lat": 7.95, "lng": 80.75},
         "rating": 4.8, "user_ratings_total": 5000, "business_status": "OPERATIONAL"},
        {"name": "Galle Fort", "region": "Southern", "coords": {"lat": 6.03, "lng": 80.21}}
    ]}"#;

    #[test]
    fn test_load_inline_scores() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_sri_lanka.json", PROFILE);
        write(&adapter, "locations-sri-lanka.json", LOCATIONS);

        let view = adapter.load(&DatasetId::from_display("Sri Lanka")).unwrap();
        assert_eq!(view.name, "Sri Lanka");
        assert!(!view.ratings_applied);
        assert_eq!(view.scores.len(), 3);
        assert_eq!(view.scores[2].label, "Living Costs");
        assert_eq!(view.max_score, 30.0);
        assert_eq!(view.summary.total_display, "24");
        assert_eq!(view.locations[0].rating, "★ 4.8 (5000 reviews)");
        assert_eq!(view.locations[1].rating, "No ratings");
        assert_eq!(view.sources.locations, "locations-sri-lanka.json");
        assert!((view.map_center.lat - 6.99).abs() < 1e-9);
    }

    #[test]
    fn test_ratings_file_overrides_inline_scores() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_sri_lanka.json", PROFILE);
        write(&adapter, "locations_sri_lanka.json", LOCATIONS);
        write(
            &adapter,
            "ratings_sri_lanka.json",
            r#"{"scores": {"safety": {"overall_score": 6, "subcategories": {"crime": {"score": 6, "description": "Low"}}, "notes": "Mostly safe"}}}"#,
        );

        let view = adapter.load(&DatasetId::from_display("Sri Lanka")).unwrap();
        assert!(view.ratings_applied);
        assert_eq!(view.scores.len(), 1);
        assert_eq!(view.scores[0].score.value, 6.0);
        assert_eq!(view.scores[0].score.notes.as_deref(), Some("Mostly safe"));
        assert_eq!(view.max_score, 10.0);
        assert_eq!(view.sources.ratings.as_deref(), Some("ratings_sri_lanka.json"));
    }

    #[test]
    fn test_missing_locations_is_not_found() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_peru.json", PROFILE);
        let id = DatasetId::from_display("Peru");
        assert!(adapter.load(&id).is_none());
        assert!(matches!(
            adapter.require(&id),
            Err(wayfarer_core::Error::NotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_profile_is_not_found() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_peru.json", "{\"scores\": ");
        write(&adapter, "locations_peru.json", LOCATIONS);
        assert!(adapter.load(&DatasetId::from_display("Peru")).is_none());
    }

    #[test]
    fn test_empty_dataset_uses_defaults() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_japan.json", "{}");
        write(&adapter, "locations_japan.json", "{}");

        let view = adapter.load(&DatasetId::from_display("Japan")).unwrap();
        assert!(view.scores.is_empty());
        assert_eq!(view.max_score, 0.0);
        assert_eq!(view.summary.total_display, "N/A");
        assert_eq!(view.map_center.lat, MapDefaults::default().center_lat);
    }

    #[test]
    fn test_null_fields_still_load() {
        let (adapter, _dir) = adapter();
        write(
            &adapter,
            "country_peru.json",
            r#"{
                "location": {"name": "Peru", "region": null},
                "scores": {"safety": 6},
                "summary": {"total_score": "7/10", "strengths": null, "weaknesses": ["Altitude"], "overall_notes": null}
            }"#,
        );
        write(
            &adapter,
            "locations_peru.json",
            r#"{"recommended_locations": [
                {"name": "Machu Picchu", "region": "Cusco", "coords": {"lat": -13.16, "lng": -72.54},
                 "brief": null, "formatted_address": null, "price_level": 99},
                {"name": "Rainbow Mountain", "coords": null}
            ]}"#,
        );

        let view = adapter.load(&DatasetId::from_display("Peru")).unwrap();
        assert_eq!(view.summary.total_display, "7/10");
        assert_eq!(view.summary.total_score, None);
        assert!(view.summary.strengths.is_empty());
        assert_eq!(view.summary.overall_notes, "");
        assert_eq!(view.locations[0].brief, "No description available.");
        assert_eq!(view.locations[0].address, "N/A");
        assert_eq!(view.locations[0].price, "$$$$");
        assert_eq!(view.locations[1].coords, wayfarer_store::Coords::default());
    }

    #[test]
    fn test_numeric_text_total_is_parsed() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_peru.json", r#"{"summary": {"total_score": "42"}}"#);
        write(&adapter, "locations_peru.json", "{}");

        let view = adapter.load(&DatasetId::from_display("Peru")).unwrap();
        assert_eq!(view.summary.total_score, Some(42.0));
        assert_eq!(view.summary.total_display, "42");
    }

    #[test]
    fn test_blank_name_is_not_found() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_.json", "{}");
        write(&adapter, "locations_.json", "{}");
        assert!(adapter.load(&DatasetId::from_display("  ")).is_none());
        assert!(adapter.load(&DatasetId::from_display("???")).is_none());
    }

    #[test]
    fn test_list() {
        let (adapter, _dir) = adapter();
        write(&adapter, "country_sri_lanka.json", PROFILE);
        write(&adapter, "country-japan.json", "{}");
        assert_eq!(adapter.list().unwrap(), vec!["Japan", "Sri Lanka"]);
    }
}
