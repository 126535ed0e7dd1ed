//! Story Orchestrator: sequences transcription, text generation, image
//! generation, and composition into one run against a persisted record.
//!
//! The adapters are trait seams so the HTTP layer can wire in real provider
//! clients while tests substitute fakes. No adapter error ever crosses the
//! orchestrator boundary: every outcome lands on the story record as a
//! status plus optional error message.

pub mod adapters;
pub mod error;
pub mod prompts;
pub mod run;
pub mod state;

pub use adapters::{
    AudioFormat, GeneratedText, ImageGenerator, ImageKind, StoryGenerator, Transcriber,
};
pub use error::RunError;
pub use run::StoryPipeline;
pub use state::RunStage;
