//! Places directory client (Google Places API v1).
//!
//! A lookup is a text search limited to one match, followed by a details
//! fetch for the richer fields. Zero matches is a normal outcome and yields
//! `Ok(None)`; transport and auth failures are errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, warn};
use wayfarer_core::{Error, Result};

use crate::types::{PlaceDetails, PlaceResource, SearchTextResponse};

pub const PLACES_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const PHOTO_MAX_HEIGHT_PX: u32 = 400;

const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.types,places.photos,places.rating,places.userRatingCount,\
places.businessStatus,places.priceLevel";

const DETAILS_FIELD_MASK: &str = "id,formattedAddress,location,types,displayName,\
photos,rating,userRatingCount,businessStatus,priceLevel";

/// Look up verified venue data by name and region.
#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    /// At most one enriched record; `None` when nothing matches.
    async fn lookup(&self, name: &str, region: &str) -> Result<Option<PlaceDetails>>;
}

/// Places API client.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: PLACES_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn search_text(&self, query: &str) -> Result<SearchTextResponse> {
        let body = json!({
            "textQuery": query,
            "languageCode": "en",
            "maxResultCount": 1,
        });

        let response = self
            .client
            .post(format!("{}/places:searchText", self.base_url))
            .header("Content-Type", "application/json")
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Places search failed: {}", e)))?;

        read_json(response, "search").await
    }

    async fn details(&self, place_id: &str) -> Result<PlaceResource> {
        let response = self
            .client
            .get(format!("{}/places/{}", self.base_url, place_id))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", DETAILS_FIELD_MASK)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Places details failed: {}", e)))?;

        read_json(response, "details").await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("Places {} error {}: {}", what, status, body);
        return Err(Error::Transport(format!(
            "Places {} error {}: {}",
            what, status, body
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| Error::Transport(format!("Places {} response unreadable: {}", what, e)))
}

#[async_trait]
impl PlaceDirectory for PlacesClient {
    async fn lookup(&self, name: &str, region: &str) -> Result<Option<PlaceDetails>> {
        debug!("Getting coordinates and details for {} in {}", name, region);

        let search = self.search_text(&format!("{}, {}", name, region)).await?;
        let Some(first) = search.places.into_iter().next() else {
            warn!("No directory results found for {}", name);
            return Ok(None);
        };

        let resource = self.details(&first.id).await?;
        let details = into_details(resource, &self.api_key);
        if details.is_none() {
            warn!("Directory entry for {} has no coordinates", name);
        }
        Ok(details)
    }
}

/// Displayable photo URL for a photo resource name.
pub fn photo_media_url(photo_name: &str, api_key: &str, max_height_px: u32) -> String {
    format!(
        "{}/{}/media?key={}&maxHeightPx={}",
        PLACES_BASE_URL, photo_name, api_key, max_height_px
    )
}

/// Flatten a details resource. Entries without a location cannot be mapped
/// and are treated as not found.
pub fn into_details(resource: PlaceResource, api_key: &str) -> Option<PlaceDetails> {
    let location = resource.location?;
    let photo_url = resource
        .photos
        .first()
        .map(|p| photo_media_url(&p.name, api_key, PHOTO_MAX_HEIGHT_PX));

    Some(PlaceDetails {
        name: resource
            .display_name
            .map(|d| d.text)
            .unwrap_or_default(),
        place_id: resource.id,
        lat: location.latitude,
        lng: location.longitude,
        formatted_address: resource.formatted_address.unwrap_or_default(),
        types: resource.types,
        photo_url,
        rating: resource.rating,
        user_ratings_total: resource.user_rating_count,
        business_status: resource.business_status,
        price_level: resource.price_level,
    })
}
