//! Audio upload models.

use serde::Serialize;
use sqlx::FromRow;
use storygen_core::types::Timestamp;
use uuid::Uuid;

use super::status::StatusId;

/// A row from the `audio_uploads` table.
///
/// Linked 1:1 to the story record it seeds; retained after transcription
/// for audit and display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AudioUpload {
    pub id: Uuid,
    pub story_id: Uuid,
    pub filename: String,
    pub format: String,
    pub transcribed_text: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
}
