//! Run failure taxonomy.
//!
//! [`RunError`] is the only error the executor handles: each adapter error
//! converts into the variant naming the stage that failed, and the variant's
//! `Display` string is exactly what lands in the record's `error_message`.

use storygen_core::compose::ComposeError;

use crate::adapters::{GenerationError, ImageGenerationError, TranscriptionError};

/// Why a run failed. Never propagates past the orchestrator boundary.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("TranscriptionError: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("GenerationError: {0}")]
    Generation(#[from] GenerationError),

    #[error("ImageGenerationError: {0}")]
    ImageGeneration(#[from] ImageGenerationError),

    #[error("CompositionError: {0}")]
    Composition(#[from] ComposeError),

    /// Database or media-file storage failure.
    #[error("PersistenceError: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for RunError {
    fn from(e: sqlx::Error) -> Self {
        RunError::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Persistence(e.to_string())
    }
}
