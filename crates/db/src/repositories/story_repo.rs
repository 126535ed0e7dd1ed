//! Repository for the `stories` table.
//!
//! Status transitions are enforced in SQL: every update carries a guard so
//! that a terminal row can never move again and a stage can never go
//! backwards. Callers learn from the returned `bool` whether the guarded
//! update actually applied.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::status::{StatusId, StoryStatus};
use crate::models::story::{CompletedStory, Story, StoryListQuery};

/// Column list for `stories` queries.
const COLUMNS: &str = "\
    id, prompt, story, character_description, \
    character_image, background_image, composite_image, \
    status_id, error_message, created_at, updated_at";

/// Maximum page size for story listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for story listing.
const DEFAULT_LIMIT: i64 = 50;

/// Terminal statuses: completed, failed.
const TERMINAL_STATUSES: [StatusId; 2] = [
    StoryStatus::Completed as StatusId,
    StoryStatus::Failed as StatusId,
];

/// Provides CRUD operations for story generation records.
pub struct StoryRepo;

impl StoryRepo {
    /// Create a new record in `pending` status. Returns the full row.
    pub async fn create(pool: &PgPool, prompt: &str) -> Result<Story, sqlx::Error> {
        let query = format!(
            "INSERT INTO stories (prompt, status_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(prompt)
            .bind(StoryStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a story by its ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List stories newest-first with pagination.
    ///
    /// `completed` defaults to `true` (the gallery view); pass
    /// `completed=false` to list every record regardless of status.
    pub async fn list(pool: &PgPool, params: &StoryListQuery) -> Result<Vec<Story>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);
        let completed_only = params.completed.unwrap_or(true);

        let where_clause = if completed_only {
            "WHERE status_id = $3"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM stories \
             {where_clause} \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        );

        let mut q = sqlx::query_as::<_, Story>(&query).bind(limit).bind(offset);
        if completed_only {
            q = q.bind(StoryStatus::Completed.id());
        }
        q.fetch_all(pool).await
    }

    /// Advance a run to a later non-terminal stage.
    ///
    /// The guard `status_id < $2` makes transitions monotonic: a later (or
    /// terminal) row is left untouched and `false` is returned.
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: StoryStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stories SET status_id = $2 WHERE id = $1 AND status_id < $2",
        )
        .bind(id)
        .bind(status.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the prompt after transcription, before generation starts.
    ///
    /// Only applies while the run is non-terminal.
    pub async fn set_prompt(pool: &PgPool, id: Uuid, prompt: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stories SET prompt = $2 WHERE id = $1 AND status_id NOT IN ($3, $4)",
        )
        .bind(id)
        .bind(prompt)
        .bind(TERMINAL_STATUSES[0])
        .bind(TERMINAL_STATUSES[1])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a run completed, storing all generated content atomically.
    ///
    /// Completion only applies from `Composing`, the sole legal predecessor;
    /// a run that has not passed through every stage (or is already
    /// terminal) is left untouched and `false` is returned.
    pub async fn complete(
        pool: &PgPool,
        id: Uuid,
        content: &CompletedStory,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stories \
             SET status_id = $2, story = $3, character_description = $4, \
                 character_image = $5, background_image = $6, composite_image = $7 \
             WHERE id = $1 AND status_id = $8",
        )
        .bind(id)
        .bind(StoryStatus::Completed.id())
        .bind(&content.story)
        .bind(&content.character_description)
        .bind(&content.character_image)
        .bind(&content.background_image)
        .bind(&content.composite_image)
        .bind(StoryStatus::Composing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a run failed with a human-readable error message.
    ///
    /// No automatic retry exists; a failed run stays failed and the user
    /// must resubmit.
    pub async fn fail(pool: &PgPool, id: Uuid, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stories \
             SET status_id = $2, error_message = $3 \
             WHERE id = $1 AND status_id NOT IN ($4, $5)",
        )
        .bind(id)
        .bind(StoryStatus::Failed.id())
        .bind(error)
        .bind(TERMINAL_STATUSES[0])
        .bind(TERMINAL_STATUSES[1])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a story, returning the deleted row so the caller can remove
    /// its media files. The linked audio upload row cascades.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("DELETE FROM stories WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
