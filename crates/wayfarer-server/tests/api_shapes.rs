//! Response shape tests: field names the map frontend reads from the API.
//!
//! These serialize the real response types directly (no HTTP server needed)
//! and check field names and JSON types.

use serde_json::json;
use wayfarer_core::{DatasetId, MapDefaults};
use wayfarer_resolve::DisplayAdapter;
use wayfarer_runtime::{GeneratedFiles, GenerationRequest, Progress};
use wayfarer_store::{
    CountryProfile, DatasetStore, LocationCollection, LocationRecord, RatingsDocument,
};

fn seeded_adapter() -> (DisplayAdapter, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::open(dir.path()).unwrap();
    let id = DatasetId::from_display("Kandy Temples");

    let profile: CountryProfile = serde_json::from_value(json!({
        "location": {"name": "Kandy", "region": "Central", "country": "Sri Lanka"},
        "scores": {"culture": 9, "safety": 7},
        "summary": {"total_score": 16, "strengths": ["Temples"], "weaknesses": ["Traffic"], "overall_notes": "Hill capital"}
    }))
    .unwrap();
    store.save_country(&id, &profile).unwrap();
    store
        .save_locations(
            &id,
            &LocationCollection {
                recommended_locations: vec![LocationRecord {
                    name: "Temple of the Tooth".into(),
                    region: "Kandy".into(),
                    rating: Some(4.7),
                    user_ratings_total: Some(30000),
                    ..Default::default()
                }],
            },
        )
        .unwrap();

    (DisplayAdapter::new(store, MapDefaults::default()), dir)
}

/// Unified view: top-level keys, score rows and location rows.
#[test]
fn test_unified_view_shape() {
    let (adapter, _dir) = seeded_adapter();
    let view = adapter
        .load(&DatasetId::from_display("Kandy Temples"))
        .unwrap();
    let v = serde_json::to_value(&view).unwrap();

    for key in [
        "name",
        "location",
        "scores",
        "summary",
        "locations",
        "ratings_applied",
        "max_score",
        "map_center",
        "sources",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }

    assert!(v["scores"][0]["key"].is_string());
    assert!(v["scores"][0]["label"].is_string());
    assert!(v["scores"][0]["score"]["value"].is_number());
    assert!(v["scores"][0]["score"].get("breakdown").is_none());

    let row = &v["locations"][0];
    assert_eq!(row["rating"], "★ 4.7 (30000 reviews)");
    assert_eq!(row["status"], "N/A");
    assert_eq!(row["brief"], "No description available.");
    assert!(row["coords"]["lat"].is_number());

    assert!(v["map_center"]["zoom"].is_number());
    assert_eq!(v["summary"]["total_display"], "16");
}

/// Generation request body accepted by POST /api/generate.
#[test]
fn test_generation_request_shape() {
    let req: GenerationRequest = serde_json::from_value(json!({
        "location": "Kandy",
        "keyword": "temples",
        "radiusKm": 25,
        "results": 3
    }))
    .unwrap();
    assert_eq!(req.radius_km, 25);
    assert!(req.validate().is_ok());
}

/// Progress events and job results.
#[test]
fn test_progress_shape() {
    let files = GeneratedFiles {
        country_file: "country_kandy_temples.json".into(),
        locations_file: "locations_kandy_temples.json".into(),
    };
    let v = serde_json::to_value(Progress::Saved {
        files: files.clone(),
    })
    .unwrap();
    assert_eq!(v["kind"], "saved");
    assert_eq!(v["files"]["countryFile"], "country_kandy_temples.json");
    assert_eq!(v["files"]["locationsFile"], "locations_kandy_temples.json");
}

/// Ratings documents pass through with their extra keys.
#[test]
fn test_ratings_document_shape() {
    let doc: RatingsDocument = serde_json::from_value(json!({
        "location": {"name": "Kandy"},
        "scores": {"culture": {"overall_score": 9, "subcategories": {}, "notes": "Rich"}},
        "summary": {"total_score": 9}
    }))
    .unwrap();
    let v = serde_json::to_value(&doc).unwrap();
    assert!(v["scores"]["culture"]["overall_score"].is_number());
    assert!(v["location"].is_object());
    assert!(v["summary"].is_object());
}
