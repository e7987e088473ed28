//! Deterministic service doubles for pipeline tests.
//!
//! `MockCompletion` answers prompts by substring match and `MockDirectory`
//! answers lookups by place name. Both record their calls for assertions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use wayfarer_chat::{CompletionClient, ServiceKind};
use wayfarer_core::{Error, Result};
use wayfarer_places::{PlaceDetails, PlaceDirectory};

/// Completion client returning canned responses.
#[derive(Clone)]
pub struct MockCompletion {
    service: ServiceKind,
    /// (prompt substring, response), first match wins.
    responses: Arc<RwLock<Vec<(String, String)>>>,
    fail_with: Arc<RwLock<Option<String>>>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockCompletion {
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            responses: Arc::default(),
            fail_with: Arc::default(),
            prompts: Arc::default(),
        }
    }

    /// Respond with `response` to any prompt containing `needle`.
    pub fn with_response(self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.write().push((needle.into(), response.into()));
        self
    }

    /// Fail every call with a transport error.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.fail_with.write() = Some(message.into());
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.write().push(prompt.to_string());
        if let Some(message) = self.fail_with.read().clone() {
            return Err(Error::Transport(message));
        }
        self.responses
            .read()
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| Error::Transport(format!("{} mock: no response configured", self.service)))
    }

    fn service(&self) -> ServiceKind {
        self.service
    }
}

/// Place directory backed by a name → details map.
#[derive(Clone, Default)]
pub struct MockDirectory {
    places: Arc<RwLock<HashMap<String, PlaceDetails>>>,
    fail_on: Arc<RwLock<Option<String>>>,
    lookups: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a verified place under `name`.
    pub fn with_place(self, name: impl Into<String>, details: PlaceDetails) -> Self {
        self.places.write().insert(name.into(), details);
        self
    }

    /// Fail with a transport error when `name` is looked up.
    pub fn failing_on(self, name: impl Into<String>) -> Self {
        *self.fail_on.write() = Some(name.into());
        self
    }

    /// (name, region) pairs looked up so far.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.read().clone()
    }
}

#[async_trait]
impl PlaceDirectory for MockDirectory {
    async fn lookup(&self, name: &str, region: &str) -> Result<Option<PlaceDetails>> {
        self.lookups.write().push((name.to_string(), region.to_string()));
        if self.fail_on.read().as_deref() == Some(name) {
            return Err(Error::Transport(format!("directory unavailable for {}", name)));
        }
        Ok(self.places.read().get(name).cloned())
    }
}

/// A verified place at the given coordinates.
pub fn place(name: &str, lat: f64, lng: f64) -> PlaceDetails {
    PlaceDetails {
        place_id: format!("place-{}", wayfarer_core::slug::slugify(name)),
        name: name.to_string(),
        lat,
        lng,
        formatted_address: format!("{}, Sri Lanka", name),
        types: vec!["tourist_attraction".into()],
        photo_url: Some(format!("https://photos.example/{}", wayfarer_core::slug::slugify(name))),
        rating: Some(4.5),
        user_ratings_total: Some(120),
        business_status: Some("OPERATIONAL".into()),
        price_level: None,
    }
}

/// Wrap `json` in a fenced block the way the services answer.
pub fn fenced(json: &serde_json::Value) -> String {
    format!("Here is the data:\n```json\n{}\n```\n", json)
}
