//! Local media file store.
//!
//! Generated images land in `<root>/generated_images/`, uploaded audio in
//! `<root>/audio_uploads/`. Records store bare filenames; the URL helpers
//! here map filenames to the `/media/...` paths served by the HTTP layer.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Directory for generated images, relative to the media root.
pub const IMAGE_DIR: &str = "generated_images";
/// Directory for uploaded audio files, relative to the media root.
pub const AUDIO_DIR: &str = "audio_uploads";

/// Filesystem store for generated images and uploaded audio.
///
/// Cheap to clone; holds only the media root path.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at `root`. Call [`ensure_dirs`](Self::ensure_dirs)
    /// once at startup before saving anything.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Media root directory (mounted at `/media` by the HTTP layer).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the image and audio subdirectories if they do not exist.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(IMAGE_DIR)).await?;
        tokio::fs::create_dir_all(self.root.join(AUDIO_DIR)).await?;
        Ok(())
    }

    /// Whether both media subdirectories exist.
    pub async fn is_ready(&self) -> bool {
        let image_dir = tokio::fs::metadata(self.root.join(IMAGE_DIR)).await;
        let audio_dir = tokio::fs::metadata(self.root.join(AUDIO_DIR)).await;
        matches!((&image_dir, &audio_dir), (Ok(i), Ok(a)) if i.is_dir() && a.is_dir())
    }

    /// Save image bytes under a generated `{prefix}_{8-hex}.png` filename.
    ///
    /// Returns the bare filename for storage on the record.
    pub async fn save_image(&self, prefix: &str, bytes: &[u8]) -> std::io::Result<String> {
        let filename = format!("{prefix}_{}.png", short_id());
        tokio::fs::write(self.root.join(IMAGE_DIR).join(&filename), bytes).await?;
        Ok(filename)
    }

    /// Save uploaded audio bytes, preserving the declared extension.
    pub async fn save_audio(&self, extension: &str, bytes: &[u8]) -> std::io::Result<String> {
        let filename = format!("audio_{}.{}", short_id(), extension.to_ascii_lowercase());
        tokio::fs::write(self.root.join(AUDIO_DIR).join(&filename), bytes).await?;
        Ok(filename)
    }

    /// Read a previously saved audio file.
    pub async fn read_audio(&self, filename: &str) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(AUDIO_DIR).join(filename)).await
    }

    /// Delete a generated image. Missing files are not an error; a record
    /// may have failed before all of its images were written.
    pub async fn delete_image(&self, filename: &str) -> std::io::Result<()> {
        remove_if_exists(self.root.join(IMAGE_DIR).join(filename)).await
    }

    /// Delete an uploaded audio file. Missing files are not an error.
    pub async fn delete_audio(&self, filename: &str) -> std::io::Result<()> {
        remove_if_exists(self.root.join(AUDIO_DIR).join(filename)).await
    }

    /// Public URL for a generated image filename.
    pub fn image_url(filename: &str) -> String {
        format!("/media/{IMAGE_DIR}/{filename}")
    }

    /// Public URL for an uploaded audio filename.
    pub fn audio_url(filename: &str) -> String {
        format!("/media/{AUDIO_DIR}/{filename}")
    }
}

/// First 8 hex characters of a fresh UUID, enough to keep generated media
/// filenames unique within one deployment.
fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn remove_if_exists(path: PathBuf) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
