//! Dataset generation runtime.
//!
//! Drives the search service, the place directory and the conversational
//! service through the Identify → Enrich → Persist stages, plus the Deepen
//! step that produces detailed ratings.

pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod testing;
pub mod types;

pub use extract::extract_fenced_json;
pub use pipeline::GenerationPipeline;
pub use types::*;
