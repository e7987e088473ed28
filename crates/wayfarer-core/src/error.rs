//! Error types for Wayfarer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Network, HTTP status or authentication failure talking to a remote service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An AI response did not carry the expected fenced JSON payload.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed JSON missing a required key.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline stage failed; `source` is the originating cause.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the name of the pipeline stage it aborted.
    ///
    /// Already-wrapped errors keep their original stage.
    pub fn in_stage(self, stage: impl std::fmt::Display) -> Self {
        match self {
            Error::Stage { .. } => self,
            other => Error::Stage {
                stage: stage.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost cause, looking through stage wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
