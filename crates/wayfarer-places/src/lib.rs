//! Places directory: the trusted source of coordinates and venue metadata.
//!
//! Wraps the Places API text search and details endpoints behind the
//! `PlaceDirectory` trait so the generation pipeline can be driven by a
//! test double.

pub mod client;
pub mod types;

pub use client::{PlaceDirectory, PlacesClient};
pub use types::PlaceDetails;
