//! Sequential run executor.

use std::sync::Arc;

use sqlx::PgPool;
use storygen_core::{compose, MediaStore};
use storygen_db::models::audio::AudioUpload;
use storygen_db::models::story::CompletedStory;
use storygen_db::repositories::{AudioRepo, StoryRepo};
use uuid::Uuid;

use crate::adapters::{
    AudioFormat, ImageGenerator, ImageKind, StoryGenerator, Transcriber, TranscriptionError,
};
use crate::error::RunError;
use crate::prompts;
use crate::state::RunStage;

/// Drives one generation run end to end against its story record.
///
/// Cheap to clone: adapters are shared behind `Arc`, the pool and media
/// store are themselves cheap clones.
#[derive(Clone)]
pub struct StoryPipeline {
    pool: PgPool,
    media: MediaStore,
    transcriber: Arc<dyn Transcriber>,
    story_generator: Arc<dyn StoryGenerator>,
    image_generator: Arc<dyn ImageGenerator>,
}

impl StoryPipeline {
    pub fn new(
        pool: PgPool,
        media: MediaStore,
        transcriber: Arc<dyn Transcriber>,
        story_generator: Arc<dyn StoryGenerator>,
        image_generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            pool,
            media,
            transcriber,
            story_generator,
            image_generator,
        }
    }

    /// Execute the run for `story_id`. Never returns an error: every failure
    /// is recorded on the story row and logged, so the spawning handler has
    /// nothing to await or handle.
    pub async fn execute(&self, story_id: Uuid) {
        match self.run(story_id).await {
            Ok(()) => {
                tracing::info!(%story_id, "Story run completed");
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(%story_id, error = %message, "Story run failed");
                match StoryRepo::fail(&self.pool, story_id, &message).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(%story_id, "Run already terminal, failure not recorded");
                    }
                    Err(db_err) => {
                        tracing::error!(%story_id, error = %db_err, "Could not record run failure");
                    }
                }
            }
        }
    }

    /// The ordered pipeline. Each stage advances the record's status before
    /// doing its work so a poller observes progress.
    async fn run(&self, story_id: Uuid) -> Result<(), RunError> {
        let story = StoryRepo::find_by_id(&self.pool, story_id)
            .await?
            .ok_or_else(|| RunError::Persistence(format!("story {story_id} not found")))?;

        let audio = AudioRepo::find_by_story(&self.pool, story_id).await?;

        // TRANSCRIBING (audio runs only)
        let prompt = match audio {
            Some(audio) => {
                self.advance(story_id, RunStage::Transcribing).await?;
                let text = self.transcribe(&audio).await?;
                let updated = StoryRepo::set_prompt(&self.pool, story_id, &text).await?;
                if !updated {
                    return Err(RunError::Persistence(format!(
                        "story {story_id} rejected the transcribed prompt"
                    )));
                }
                text
            }
            None => story.prompt,
        };

        // GENERATING_TEXT
        self.advance(story_id, RunStage::GeneratingText).await?;
        let text = self.story_generator.generate(&prompt).await?;

        // GENERATING_IMAGES: both images or nothing, in a fixed order.
        self.advance(story_id, RunStage::GeneratingImages).await?;
        let character_bytes = self
            .image_generator
            .generate(
                &prompts::character_image_prompt(&text.character_description),
                ImageKind::Character,
            )
            .await?;
        let background_bytes = self
            .image_generator
            .generate(
                &prompts::background_image_prompt(&text.story),
                ImageKind::Background,
            )
            .await?;

        // COMPOSING
        self.advance(story_id, RunStage::Composing).await?;
        let composite_bytes = compose::compose(&character_bytes, &background_bytes)?;

        let character_image = self
            .media
            .save_image(ImageKind::Character.prefix(), &character_bytes)
            .await?;
        let background_image = self
            .media
            .save_image(ImageKind::Background.prefix(), &background_bytes)
            .await?;
        let composite_image = self.media.save_image("composite", &composite_bytes).await?;

        // COMPLETED
        let content = CompletedStory {
            story: text.story,
            character_description: text.character_description,
            character_image,
            background_image,
            composite_image,
        };
        self.finalize(story_id, &content).await
    }

    /// Record a finished run's content on its row.
    ///
    /// If the row left the composing stage while the media files were being
    /// written (failed or deleted concurrently), the guarded update is
    /// rejected; the files named in `content` are removed again so nothing
    /// unreferenced stays on disk, and a `Persistence` error is returned.
    pub async fn finalize(
        &self,
        story_id: Uuid,
        content: &CompletedStory,
    ) -> Result<(), RunError> {
        let completed = StoryRepo::complete(&self.pool, story_id, content).await?;
        if completed {
            return Ok(());
        }

        for filename in [
            &content.character_image,
            &content.background_image,
            &content.composite_image,
        ] {
            if let Err(e) = self.media.delete_image(filename).await {
                tracing::warn!(%story_id, filename = %filename, error = %e, "Could not remove orphaned image");
            }
        }
        Err(RunError::Persistence(format!(
            "story {story_id} left the composing stage before completion could be recorded"
        )))
    }

    /// Transcribe an uploaded audio file, recording the outcome on the
    /// audio row either way.
    async fn transcribe(&self, audio: &AudioUpload) -> Result<String, RunError> {
        AudioRepo::mark_processing(&self.pool, audio.id).await?;

        let result = self.transcribe_inner(audio).await;
        match &result {
            Ok(text) => AudioRepo::mark_transcribed(&self.pool, audio.id, text).await?,
            Err(_) => AudioRepo::mark_failed(&self.pool, audio.id).await?,
        }
        result.map_err(RunError::from)
    }

    async fn transcribe_inner(&self, audio: &AudioUpload) -> Result<String, TranscriptionError> {
        let format = AudioFormat::from_extension(&audio.format)
            .ok_or_else(|| TranscriptionError::UnsupportedFormat(audio.format.clone()))?;

        let bytes = self
            .media
            .read_audio(&audio.filename)
            .await
            .map_err(|e| TranscriptionError::Service(format!("could not read audio file: {e}")))?;

        self.transcriber.transcribe(&bytes, format).await
    }

    async fn advance(&self, story_id: Uuid, stage: RunStage) -> Result<(), RunError> {
        let applied = StoryRepo::set_status(&self.pool, story_id, stage.status()).await?;
        if applied {
            tracing::debug!(%story_id, stage = ?stage, "Run advanced");
            Ok(())
        } else {
            Err(RunError::Persistence(format!(
                "story {story_id} rejected transition to {stage:?}"
            )))
        }
    }
}
