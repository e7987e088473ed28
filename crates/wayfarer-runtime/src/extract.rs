//! JSON extraction from model responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use wayfarer_core::{Error, Result};

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json(.*?)```").expect("fence pattern is valid"));

/// Parse the first ```` ```json ```` fenced block in `text`.
///
/// No fence is a [`Error::Parse`]; so is a fence whose body is not valid
/// JSON, with the decode error in the message.
pub fn extract_fenced_json(text: &str) -> Result<Value> {
    let body = JSON_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| {
            debug!("No JSON fence in response: {}", text);
            Error::Parse("could not extract JSON from response".into())
        })?;

    serde_json::from_str(body).map_err(|e| {
        debug!("Invalid fenced JSON: {}", body);
        Error::Parse(format!("invalid JSON in response: {}", e))
    })
}
