//! Chat types shared by the completion clients.

use serde::{Deserialize, Serialize};

/// Remote services Wayfarer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Search-augmented completion (Perplexity).
    Search,
    /// Conversational completion (Anthropic).
    Conversational,
    /// Places directory (Google Places).
    Directory,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceKind::Search => write!(f, "search"),
            ServiceKind::Conversational => write!(f, "conversational"),
            ServiceKind::Directory => write!(f, "directory"),
        }
    }
}

/// Chat message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Service configuration response (keys masked).
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    #[serde(rename = "searchConfigured")]
    pub search_configured: bool,
    #[serde(rename = "conversationalConfigured")]
    pub conversational_configured: bool,
    #[serde(rename = "directoryConfigured")]
    pub directory_configured: bool,
    #[serde(rename = "searchModel")]
    pub search_model: String,
    #[serde(rename = "conversationalModel")]
    pub conversational_model: String,
}
