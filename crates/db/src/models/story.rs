//! Story record models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storygen_core::types::Timestamp;
use uuid::Uuid;
use validator::Validate;

use super::status::StatusId;

/// Maximum accepted prompt length.
pub const MAX_PROMPT_LEN: usize = 1000;

/// A row from the `stories` table: the persisted artifact of one
/// generation run.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: Uuid,
    pub prompt: String,
    pub story: Option<String>,
    pub character_description: Option<String>,
    pub character_image: Option<String>,
    pub background_image: Option<String>,
    pub composite_image: Option<String>,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a typed prompt via `POST /api/v1/stories`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitStory {
    /// The user's prompt. Must be non-empty after trimming.
    #[validate(length(min = 1, max = 1000, message = "prompt must be 1-1000 characters"))]
    pub prompt: String,
}

/// Values produced by a completed run, stored together on the record.
#[derive(Debug, Clone)]
pub struct CompletedStory {
    pub story: String,
    pub character_description: String,
    pub character_image: String,
    pub background_image: String,
    pub composite_image: String,
}

/// Query parameters for `GET /api/v1/stories`.
#[derive(Debug, Default, Deserialize)]
pub struct StoryListQuery {
    /// When `true` (the gallery default) only completed stories are listed;
    /// `false` lists every record regardless of status.
    pub completed: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
