//! Directory types: Places API wire format and the enriched result.

use serde::{Deserialize, Serialize};

/// Verified venue data returned by a directory lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub photo_url: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub business_status: Option<String>,
    /// Places API price label, e.g. `PRICE_LEVEL_MODERATE`.
    pub price_level: Option<String>,
}

/// `places:searchText` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<PlaceSummary>,
}

/// Minimal place entry from a text search.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSummary {
    pub id: String,
}

/// `places/{id}` details response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResource {
    pub id: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u64>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub price_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

/// Photo reference; `name` is the resource path `places/{id}/photos/{ref}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub name: String,
}
