//! Handlers for the `/stories` resource.
//!
//! Submission returns immediately with the created record; the generation
//! run executes as a spawned background task and the client observes
//! progress through the status endpoint.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use storygen_core::types::Timestamp;
use storygen_core::{CoreError, MediaStore};
use storygen_db::models::status::StoryStatus;
use storygen_db::models::story::{Story, StoryListQuery, SubmitStory};
use storygen_db::repositories::{AudioRepo, StoryRepo};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Placeholder prompt stored until transcription replaces it.
const AUDIO_PLACEHOLDER_PROMPT: &str = "Audio input provided";

/// Multipart field name carrying the audio file.
const AUDIO_FIELD: &str = "audio";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a story by ID or fail with 404.
async fn find_story(pool: &sqlx::PgPool, id: Uuid) -> AppResult<Story> {
    StoryRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id,
        }))
}

/// Spawn the generation run for a freshly created record. The handler does
/// not await it; the run records its own outcome.
fn spawn_run(state: &AppState, story_id: Uuid) {
    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        pipeline.execute(story_id).await;
    });
}

/// Full record plus resolved media URLs, mirroring what the gallery and
/// detail views render.
#[derive(Debug, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub story: Story,
    pub status: &'static str,
    pub character_image_url: Option<String>,
    pub background_image_url: Option<String>,
    pub composite_image_url: Option<String>,
}

impl From<Story> for StoryDetail {
    fn from(story: Story) -> Self {
        let status = status_name(story.status_id);
        let character_image_url = story.character_image.as_deref().map(MediaStore::image_url);
        let background_image_url = story.background_image.as_deref().map(MediaStore::image_url);
        let composite_image_url = story.composite_image.as_deref().map(MediaStore::image_url);
        Self {
            story,
            status,
            character_image_url,
            background_image_url,
            composite_image_url,
        }
    }
}

fn status_name(status_id: i16) -> &'static str {
    StoryStatus::from_id(status_id)
        .map(StoryStatus::name)
        .unwrap_or("unknown")
}

// ---------------------------------------------------------------------------
// Submit (typed prompt)
// ---------------------------------------------------------------------------

/// POST /api/v1/stories
///
/// Submit a typed prompt. The prompt is validated before any record exists;
/// a valid submission creates a `pending` record, spawns the run, and
/// returns 201 immediately with the record.
pub async fn submit_story(
    State(state): State<AppState>,
    Json(input): Json<SubmitStory>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let prompt = input.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "prompt must not be blank".into(),
        )));
    }

    let story = StoryRepo::create(&state.pool, prompt).await?;
    spawn_run(&state, story.id);

    tracing::info!(story_id = %story.id, "Story submitted");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StoryDetail::from(story),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Submit (audio upload)
// ---------------------------------------------------------------------------

/// POST /api/v1/stories/audio
///
/// Submit an audio recording as the prompt source. The file is stored, an
/// upload row is linked to the new record, and the run (starting with
/// transcription) is spawned. An unsupported format is not rejected here;
/// the run reaches `failed` with a transcription error message instead.
pub async fn submit_audio_story(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some(AUDIO_FIELD) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("could not read audio field: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("missing 'audio' file field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("audio file is empty".into()));
    }

    // Declared format is the filename extension; the pipeline decides
    // whether the transcription service supports it.
    let format = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let saved = state
        .media
        .save_audio(&format, &bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("could not store audio file: {e}")))?;

    let story = StoryRepo::create(&state.pool, AUDIO_PLACEHOLDER_PROMPT).await?;
    AudioRepo::create(&state.pool, story.id, &saved, &format).await?;
    spawn_run(&state, story.id);

    tracing::info!(story_id = %story.id, format = %format, "Audio story submitted");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StoryDetail::from(story),
        }),
    ))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/stories
///
/// Gallery listing, newest first. Completed stories only unless
/// `completed=false` is passed. Supports `limit` and `offset`.
pub async fn list_stories(
    State(state): State<AppState>,
    Query(params): Query<StoryListQuery>,
) -> AppResult<impl IntoResponse> {
    let stories = StoryRepo::list(&state.pool, &params).await?;
    let data: Vec<StoryDetail> = stories.into_iter().map(StoryDetail::from).collect();
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /api/v1/stories/{id}
///
/// Full record with media URLs. 404 when the record does not exist.
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let story = find_story(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: StoryDetail::from(story),
    }))
}

// ---------------------------------------------------------------------------
// Status polling
// ---------------------------------------------------------------------------

/// Lightweight polling payload. Content fields appear only once the run
/// has completed.
#[derive(Debug, Serialize)]
pub struct StoryStatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_image_url: Option<String>,
}

/// GET /api/v1/stories/{id}/status
///
/// Polling endpoint for in-flight runs.
pub async fn story_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let story = find_story(&state.pool, id).await?;

    let completed = story.status_id == StoryStatus::Completed.id();
    let response = StoryStatusResponse {
        status: status_name(story.status_id),
        error_message: story.error_message,
        created_at: story.created_at,
        updated_at: story.updated_at,
        story: completed.then_some(story.story).flatten(),
        character_description: completed.then_some(story.character_description).flatten(),
        composite_image_url: completed
            .then_some(story.composite_image.as_deref().map(MediaStore::image_url))
            .flatten(),
    };

    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/stories/{id}
///
/// Remove the record and free its media files (generated images and any
/// uploaded audio). The linked audio row cascades in the database. 404 if
/// the record does not exist, 204 on success.
pub async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    // Fetch the audio row before the delete cascades it away.
    let audio = AudioRepo::find_by_story(&state.pool, id).await?;

    let story = StoryRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Story",
            id,
        }))?;

    for filename in [
        story.character_image.as_deref(),
        story.background_image.as_deref(),
        story.composite_image.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Err(e) = state.media.delete_image(filename).await {
            tracing::warn!(story_id = %id, filename, error = %e, "Could not delete image file");
        }
    }

    if let Some(audio) = audio {
        if let Err(e) = state.media.delete_audio(&audio.filename).await {
            tracing::warn!(story_id = %id, filename = %audio.filename, error = %e, "Could not delete audio file");
        }
    }

    tracing::info!(story_id = %id, "Story deleted");

    Ok(StatusCode::NO_CONTENT)
}
