//! Run state machine.
//!
//! A run moves strictly forward; `Failed` is reachable from any non-terminal
//! stage and both terminal stages admit no further transition. The stages
//! map 1:1 onto [`StoryStatus`] ids so each transition is observable through
//! the polling endpoint.

use storygen_db::models::status::StoryStatus;

/// Stages of one story generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Pending,
    Transcribing,
    GeneratingText,
    GeneratingImages,
    Composing,
    Completed,
    Failed,
}

impl RunStage {
    /// The next stage on success. `has_audio` decides whether `Pending`
    /// enters transcription or skips straight to text generation.
    /// Terminal stages return `None`.
    pub fn next(self, has_audio: bool) -> Option<RunStage> {
        match self {
            RunStage::Pending if has_audio => Some(RunStage::Transcribing),
            RunStage::Pending => Some(RunStage::GeneratingText),
            RunStage::Transcribing => Some(RunStage::GeneratingText),
            RunStage::GeneratingText => Some(RunStage::GeneratingImages),
            RunStage::GeneratingImages => Some(RunStage::Composing),
            RunStage::Composing => Some(RunStage::Completed),
            RunStage::Completed | RunStage::Failed => None,
        }
    }

    /// Whether the stage ends the run.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStage::Completed | RunStage::Failed)
    }

    /// The persisted status corresponding to this stage.
    pub fn status(self) -> StoryStatus {
        match self {
            RunStage::Pending => StoryStatus::Pending,
            RunStage::Transcribing => StoryStatus::Transcribing,
            RunStage::GeneratingText => StoryStatus::GeneratingText,
            RunStage::GeneratingImages => StoryStatus::GeneratingImages,
            RunStage::Composing => StoryStatus::Composing,
            RunStage::Completed => StoryStatus::Completed,
            RunStage::Failed => StoryStatus::Failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
