//! AI completion clients for dataset generation.
//!
//! Two remote services are used: a search-augmented completion service for
//! factual research (country profiles, candidate locations) and a
//! conversational service for the detailed ratings narrative.

pub mod config;
pub mod providers;
pub mod types;

pub use config::ServiceConfig;
pub use providers::{CompletionClient, ConversationalClient, SearchCompletionClient};
pub use types::*;
