//! Data types for country profiles, locations and ratings.
//!
//! Files written over time use two score schemas: a bare 1–10 number per
//! category, or an object with an overall score, subcategory breakdown and
//! notes. Both deserialize into [`ScoreEntry`]; anything else is kept as
//! [`ScoreEntry::Unrecognized`] instead of failing the whole file.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Highest price tier the directory reports (`$$$$`).
pub const MAX_PRICE_TIER: u64 = 4;

/// Read an explicit `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Category name → score, in file order.
pub type ScoreMap = IndexMap<String, ScoreEntry>;

/// One category score in either schema generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreEntry {
    /// Legacy bare number.
    Flat(f64),
    /// Structured score with subcategory breakdown.
    Detailed(DetailedScore),
    /// Any other shape; preserved as written, displayed as zero.
    Unrecognized(serde_json::Value),
}

impl ScoreEntry {
    /// The headline value of this category, zero when unknown.
    pub fn overall(&self) -> f64 {
        match self {
            ScoreEntry::Flat(v) => *v,
            ScoreEntry::Detailed(d) => d.overall_score,
            ScoreEntry::Unrecognized(_) => 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, ScoreEntry::Flat(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategories: IndexMap<String, SubcategoryEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

/// A subcategory score: normally `{score, description}`, occasionally a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubcategoryEntry {
    Detailed(SubcategoryScore),
    Flat(f64),
    Unrecognized(serde_json::Value),
}

impl SubcategoryEntry {
    pub fn score(&self) -> f64 {
        match self {
            SubcategoryEntry::Detailed(s) => s.score,
            SubcategoryEntry::Flat(v) => *v,
            SubcategoryEntry::Unrecognized(_) => 0.0,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            SubcategoryEntry::Detailed(s) => &s.description,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Where a profile is about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileLocation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    #[serde(default)]
    pub total_score: Option<TotalScore>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_notes: String,
}

/// Summary total: normally a number, free text such as `"42/55"` in some
/// older files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalScore {
    Value(f64),
    Text(String),
    Unrecognized(serde_json::Value),
}

impl TotalScore {
    /// Numeric value, parsing text that is a plain number.
    pub fn value(&self) -> Option<f64> {
        match self {
            TotalScore::Value(v) => Some(*v),
            TotalScore::Text(s) => s.trim().parse().ok(),
            TotalScore::Unrecognized(_) => None,
        }
    }
}

/// Country profile file (`country_<slug>.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: ProfileLocation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scores: ScoreMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: ProfileSummary,
}

impl CountryProfile {
    /// Sum of the scores when every category is a bare number.
    ///
    /// `None` for an empty map or when any category uses the structured form.
    pub fn flat_score_total(&self) -> Option<f64> {
        if self.scores.is_empty() || !self.scores.values().all(ScoreEntry::is_flat) {
            return None;
        }
        Some(self.scores.values().map(ScoreEntry::overall).sum())
    }
}

/// Ratings file (`ratings_<slug>.json`). Keys other than `scores` are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingsDocument {
    pub scores: ScoreMap,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lng: f64,
}

/// Price tier: a number in older files, a Places label in newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceLevel {
    Tier(u64),
    Label(String),
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceLevel::Tier(0) => write!(f, "Free"),
            PriceLevel::Tier(n) => {
                let tier = (*n).min(MAX_PRICE_TIER) as usize;
                write!(f, "{}", "$".repeat(tier))
            }
            PriceLevel::Label(label) => {
                let tier = label.strip_prefix("PRICE_LEVEL_").unwrap_or(label);
                f.write_str(&wayfarer_core::slug::title_case(&tier.replace('_', " ")))
            }
        }
    }
}

/// A recommended location. Candidates from the AI carry only name, region,
/// rough coordinates and a brief; the directory fills in the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coords: Coords,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brief: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formatted_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub place_id: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub price_level: Option<PriceLevel>,
}

/// Locations file (`locations_<slug>.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended_locations: Vec<LocationRecord>,
}

impl LocationCollection {
    pub fn len(&self) -> usize {
        self.recommended_locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommended_locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_entry_shapes() {
        let scores: ScoreMap = serde_json::from_value(json!({
            "safety": 8,
            "culture": 7.5,
            "healthcare": {
                "overall_score": 6,
                "subcategories": {
                    "hospitals": {"score": 5, "description": "Few in rural areas"},
                    "pharmacies": 7
                },
                "notes": "Urban care is good"
            },
            "outdoors": {},
            "taxation": "high",
            "freedom": null
        }))
        .unwrap();

        assert_eq!(scores["safety"], ScoreEntry::Flat(8.0));
        assert_eq!(scores["culture"].overall(), 7.5);
        match &scores["healthcare"] {
            ScoreEntry::Detailed(d) => {
                assert_eq!(d.overall_score, 6.0);
                assert_eq!(d.subcategories["hospitals"].score(), 5.0);
                assert_eq!(d.subcategories["hospitals"].description(), "Few in rural areas");
                assert_eq!(d.subcategories["pharmacies"].score(), 7.0);
                assert_eq!(d.notes, "Urban care is good");
            }
            other => panic!("expected detailed score, got {other:?}"),
        }
        assert_eq!(scores["outdoors"], ScoreEntry::Detailed(DetailedScore::default()));
        assert_eq!(scores["taxation"].overall(), 0.0);
        assert_eq!(scores["freedom"].overall(), 0.0);
        let order: Vec<&str> = scores.keys().map(|k| k.as_str()).collect();
        assert_eq!(order[..3], ["safety", "culture", "healthcare"]);
    }

    #[test]
    fn test_flat_score_total() {
        let mut profile = CountryProfile::default();
        assert_eq!(profile.flat_score_total(), None);

        profile.scores.insert("safety".into(), ScoreEntry::Flat(8.0));
        profile.scores.insert("culture".into(), ScoreEntry::Flat(6.0));
        assert_eq!(profile.flat_score_total(), Some(14.0));

        profile
            .scores
            .insert("outdoors".into(), ScoreEntry::Detailed(DetailedScore::default()));
        assert_eq!(profile.flat_score_total(), None);
    }

    #[test]
    fn test_country_profile_defaults() {
        let profile: CountryProfile =
            serde_json::from_value(json!({"location": {"name": "Ella"}})).unwrap();
        assert_eq!(profile.location.name, "Ella");
        assert!(profile.scores.is_empty());
        assert_eq!(profile.summary.total_score, None);
    }

    #[test]
    fn test_candidate_location_defaults() {
        let loc: LocationRecord = serde_json::from_value(json!({
            "name": "Nine Arch Bridge",
            "region": "Badulla",
            "coords": {"lat": 6.87, "lng": 81.06},
            "brief": "Colonial-era viaduct"
        }))
        .unwrap();
        assert_eq!(loc.place_id, "");
        assert_eq!(loc.rating, None);
        assert_eq!(loc.price_level, None);
    }

    #[test]
    fn test_price_level_display() {
        assert_eq!(PriceLevel::Tier(0).to_string(), "Free");
        assert_eq!(PriceLevel::Tier(3).to_string(), "$$$");
        assert_eq!(
            PriceLevel::Label("PRICE_LEVEL_VERY_EXPENSIVE".into()).to_string(),
            "Very Expensive"
        );
        let parsed: PriceLevel = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(parsed, PriceLevel::Tier(2));
    }

    #[test]
    fn test_price_tier_is_clamped() {
        assert_eq!(PriceLevel::Tier(4).to_string(), "$$$$");
        assert_eq!(PriceLevel::Tier(9).to_string(), "$$$$");
        assert_eq!(PriceLevel::Tier(u64::MAX).to_string(), "$$$$");
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let profile: CountryProfile = serde_json::from_value(json!({
            "location": {"name": "Ella", "region": null},
            "scores": {"safety": 8},
            "summary": {
                "total_score": null,
                "strengths": null,
                "weaknesses": ["Rain"],
                "overall_notes": null
            }
        }))
        .unwrap();
        assert_eq!(profile.location.region, "");
        assert_eq!(profile.summary.total_score, None);
        assert!(profile.summary.strengths.is_empty());
        assert_eq!(profile.summary.overall_notes, "");

        let locations: LocationCollection = serde_json::from_value(json!({
            "recommended_locations": [{
                "name": "Ella Rock",
                "region": "Uva",
                "coords": {"lat": null, "lng": null},
                "brief": null,
                "formatted_address": null,
                "place_id": null
            }, {
                "name": "Ravana Falls",
                "coords": null
            }]
        }))
        .unwrap();
        let first = &locations.recommended_locations[0];
        assert_eq!(first.coords, Coords::default());
        assert_eq!(first.brief, "");
        assert_eq!(first.formatted_address, "");
        assert_eq!(locations.recommended_locations[1].coords, Coords::default());
    }

    #[test]
    fn test_total_score_accepts_text() {
        let summary: ProfileSummary =
            serde_json::from_value(json!({"total_score": "7/10"})).unwrap();
        assert_eq!(summary.total_score, Some(TotalScore::Text("7/10".into())));
        assert_eq!(summary.total_score.as_ref().and_then(TotalScore::value), None);

        let summary: ProfileSummary =
            serde_json::from_value(json!({"total_score": " 42 "})).unwrap();
        assert_eq!(summary.total_score.and_then(|t| t.value()), Some(42.0));

        let summary: ProfileSummary =
            serde_json::from_value(json!({"total_score": 38.5})).unwrap();
        assert_eq!(summary.total_score, Some(TotalScore::Value(38.5)));

        let summary: ProfileSummary =
            serde_json::from_value(json!({"total_score": [1, 2]})).unwrap();
        assert!(matches!(summary.total_score, Some(TotalScore::Unrecognized(_))));
    }

    #[test]
    fn test_ratings_document_keeps_extra_keys() {
        let doc: RatingsDocument = serde_json::from_value(json!({
            "location": {"name": "Ella"},
            "scores": {"safety": {"overall_score": 9}}
        }))
        .unwrap();
        assert_eq!(doc.scores["safety"].overall(), 9.0);
        assert!(doc.extra.contains_key("location"));
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["location"]["name"], "Ella");
    }
}
