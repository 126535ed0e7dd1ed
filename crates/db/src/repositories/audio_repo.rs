//! Repository for the `audio_uploads` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::audio::AudioUpload;
use crate::models::status::TranscriptionStatus;

/// Column list for `audio_uploads` queries.
const COLUMNS: &str =
    "id, story_id, filename, format, transcribed_text, status_id, created_at";

/// Provides CRUD operations for uploaded audio files.
pub struct AudioRepo;

impl AudioRepo {
    /// Create an upload row linked to its story record.
    pub async fn create(
        pool: &PgPool,
        story_id: Uuid,
        filename: &str,
        format: &str,
    ) -> Result<AudioUpload, sqlx::Error> {
        let query = format!(
            "INSERT INTO audio_uploads (story_id, filename, format, status_id) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AudioUpload>(&query)
            .bind(story_id)
            .bind(filename)
            .bind(format)
            .bind(TranscriptionStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find the upload linked to a story, if any.
    pub async fn find_by_story(
        pool: &PgPool,
        story_id: Uuid,
    ) -> Result<Option<AudioUpload>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audio_uploads WHERE story_id = $1");
        sqlx::query_as::<_, AudioUpload>(&query)
            .bind(story_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark transcription as in progress.
    pub async fn mark_processing(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE audio_uploads SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(TranscriptionStatus::Processing.id())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Store the transcript and mark transcription completed.
    pub async fn mark_transcribed(
        pool: &PgPool,
        id: Uuid,
        text: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE audio_uploads SET transcribed_text = $2, status_id = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(text)
        .bind(TranscriptionStatus::Completed.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark transcription failed.
    pub async fn mark_failed(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE audio_uploads SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(TranscriptionStatus::Failed.id())
            .execute(pool)
            .await?;
        Ok(())
    }
}
