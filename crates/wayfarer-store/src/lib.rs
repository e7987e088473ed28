//! Dataset model and JSON file persistence.
//!
//! A dataset is a country profile, a list of recommended locations and an
//! optional ratings document, each in its own JSON file keyed by slug.

pub mod files;
pub mod types;

pub use files::{DatasetStore, Loaded};
pub use types::*;
