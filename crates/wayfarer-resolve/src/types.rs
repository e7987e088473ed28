//! Display view types.

use serde::Serialize;
use wayfarer_core::slug::title_case;
use wayfarer_core::MapDefaults;
use wayfarer_store::{Coords, LocationRecord, ProfileLocation, ScoreEntry, TotalScore};

/// Upper bound of a single category score.
pub const CATEGORY_MAX: f64 = 10.0;

pub const NO_RATINGS: &str = "No ratings";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description available.";

/// A category score normalized for display, whatever schema it was stored in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayScore {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<SubcategoryView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&ScoreEntry> for DisplayScore {
    fn from(entry: &ScoreEntry) -> Self {
        match entry {
            ScoreEntry::Flat(v) => Self {
                value: *v,
                breakdown: None,
                notes: None,
            },
            ScoreEntry::Detailed(d) => Self {
                value: d.overall_score,
                breakdown: Some(
                    d.subcategories
                        .iter()
                        .map(|(name, sub)| SubcategoryView {
                            label: label_for(name),
                            name: name.clone(),
                            score: sub.score(),
                            description: sub.description().to_string(),
                        })
                        .collect(),
                ),
                notes: (!d.notes.is_empty()).then(|| d.notes.clone()),
            },
            ScoreEntry::Unrecognized(_) => Self {
                value: 0.0,
                breakdown: None,
                notes: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryView {
    pub name: String,
    pub label: String,
    pub score: f64,
    pub description: String,
}

/// One category row of the score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    /// Key as stored, e.g. `living_costs`.
    pub key: String,
    /// Human label, e.g. `Living Costs`.
    pub label: String,
    pub score: DisplayScore,
}

impl CategoryScore {
    pub fn new(key: &str, entry: &ScoreEntry) -> Self {
        Self {
            key: key.to_string(),
            label: label_for(key),
            score: DisplayScore::from(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub total_score: Option<f64>,
    /// `total_score` formatted, the stored text when it is not a number, or `N/A`.
    pub total_display: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub overall_notes: String,
}

/// A location with every optional field rendered to text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRow {
    pub name: String,
    pub region: String,
    pub coords: Coords,
    pub brief: String,
    pub address: String,
    pub place_id: String,
    pub photo_url: Option<String>,
    pub rating: String,
    pub status: String,
    pub price: String,
}

impl From<&LocationRecord> for LocationRow {
    fn from(loc: &LocationRecord) -> Self {
        Self {
            name: loc.name.clone(),
            region: loc.region.clone(),
            coords: loc.coords,
            brief: non_empty_or(&loc.brief, NO_DESCRIPTION),
            address: non_empty_or(&loc.formatted_address, NOT_AVAILABLE),
            place_id: loc.place_id.clone(),
            photo_url: loc.photo_url.clone(),
            rating: rating_text(loc.rating, loc.user_ratings_total),
            status: loc
                .business_status
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| title_case(s))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            price: loc
                .price_level
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

impl MapCenter {
    /// Mean of the row coordinates, or the configured default when there are none.
    pub fn of(rows: &[LocationRow], defaults: &MapDefaults) -> Self {
        if rows.is_empty() {
            return Self {
                lat: defaults.center_lat,
                lng: defaults.center_lng,
                zoom: defaults.zoom,
            };
        }
        let n = rows.len() as f64;
        Self {
            lat: rows.iter().map(|r| r.coords.lat).sum::<f64>() / n,
            lng: rows.iter().map(|r| r.coords.lng).sum::<f64>() / n,
            zoom: defaults.zoom,
        }
    }
}

/// Which files a view was assembled from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFiles {
    pub country: String,
    pub locations: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<String>,
}

/// A dataset ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedView {
    pub name: String,
    pub location: ProfileLocation,
    pub scores: Vec<CategoryScore>,
    pub summary: SummaryView,
    pub locations: Vec<LocationRow>,
    /// True when `scores` came from a ratings file.
    pub ratings_applied: bool,
    pub max_score: f64,
    pub map_center: MapCenter,
    pub sources: SourceFiles,
}

/// `living_costs` → `Living Costs`.
pub fn label_for(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

/// Integral values print without a fraction: `7`, `7.5`.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Display text for a stored summary total.
pub fn total_text(total: Option<&TotalScore>) -> String {
    match total {
        Some(TotalScore::Value(v)) => format_score(*v),
        Some(TotalScore::Text(text)) => non_empty_or(text.trim(), NOT_AVAILABLE),
        Some(TotalScore::Unrecognized(_)) | None => NOT_AVAILABLE.to_string(),
    }
}

pub fn rating_text(rating: Option<f64>, total: Option<u64>) -> String {
    match (rating, total) {
        (Some(r), Some(n)) if n > 0 => format!("★ {r:.1} ({n} reviews)"),
        (Some(r), _) => format!("★ {r:.1}"),
        (None, _) => NO_RATINGS.to_string(),
    }
}

fn non_empty_or(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
