//! Errors surfaced by the runtime API.
//!
//! Wraps spawn failures from the tactical layer, content loading and scenario
//! parsing so clients can bubble them up with consistent context.
use thiserror::Error;

use horde_core::SpawnError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("unknown archetype '{name}'")]
    UnknownArchetype { name: String },

    /// Content loading failed. Carries the full context chain of the loader
    /// error.
    #[error("failed to load content: {0}")]
    Content(String),

    #[error("invalid scenario: {0}")]
    Scenario(String),

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RuntimeError {
    pub(crate) fn content(error: anyhow::Error) -> Self {
        RuntimeError::Content(format!("{error:#}"))
    }
}
