//! Schema reconciliation: turns stored datasets into one display view.
//!
//! Profiles, location lists and ratings files written by different
//! generations of the tool differ in score schema and optional fields. The
//! adapter normalizes all of them so the presentation layer never branches
//! on shape.

pub mod adapter;
pub mod types;

pub use adapter::DisplayAdapter;
pub use types::*;
