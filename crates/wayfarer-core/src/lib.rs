//! Wayfarer Core: error taxonomy, configuration, dataset identity.

pub mod config;
pub mod error;
pub mod slug;

pub use config::{DataPaths, MapDefaults, WayfarerConfig};
pub use error::{Error, Result};
pub use slug::{DatasetId, FileFamily};
