//! Adapter traits and error types for the external generation services.
//!
//! Each adapter is a thin client wrapping one external API call. Adapters
//! make a single attempt; retry means the user resubmits.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Audio formats
// ---------------------------------------------------------------------------

/// Audio formats the transcription service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
    Aac,
}

impl AudioFormat {
    /// Parse a declared format (file extension, case-insensitive).
    /// Returns `None` for formats the transcription service rejects.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            "ogg" => Some(AudioFormat::Ogg),
            "aac" => Some(AudioFormat::Aac),
            _ => None,
        }
    }

    /// MIME type sent with the audio payload.
    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Aac => "audio/aac",
        }
    }
}

// ---------------------------------------------------------------------------
// Image kinds
// ---------------------------------------------------------------------------

/// Which image a generation request is for. Portrait framing for
/// characters, landscape for backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Character,
    Background,
}

impl ImageKind {
    /// Requested image dimensions `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageKind::Character => (800, 1024),
            ImageKind::Background => (1024, 768),
        }
    }

    /// Filename prefix for saved media.
    pub fn prefix(self) -> &'static str {
        match self {
            ImageKind::Character => "character",
            ImageKind::Background => "background",
        }
    }
}

// ---------------------------------------------------------------------------
// Adapter errors
// ---------------------------------------------------------------------------

/// Speech-to-text failures.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// The declared audio format is not accepted.
    #[error("unsupported audio format '{0}'")]
    UnsupportedFormat(String),

    /// The external service rejected the request or timed out.
    #[error("transcription service error: {0}")]
    Service(String),

    /// The service returned no text.
    #[error("transcription returned empty content")]
    Empty,
}

/// Text generation failures.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport failure, quota exhaustion, or service rejection.
    #[error("text generation service error: {0}")]
    Service(String),

    /// The API response did not have the expected shape.
    #[error("malformed text generation response: {0}")]
    MalformedResponse(String),

    /// The model returned empty output.
    #[error("text generation returned empty output")]
    Empty,
}

/// Image generation failures.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenerationError {
    /// Transport failure or timeout.
    #[error("image generation service error: {0}")]
    Service(String),

    /// Non-success HTTP status from the image service.
    #[error("image service returned status {status} for {kind} image")]
    Status { kind: &'static str, status: u16 },

    /// The service returned an empty body.
    #[error("image generation returned empty content")]
    Empty,
}

// ---------------------------------------------------------------------------
// Adapter traits
// ---------------------------------------------------------------------------

/// The (story, character description) pair produced by one generation call.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub story: String,
    pub character_description: String,
}

/// Converts uploaded audio to text. Single attempt, no retry.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<String, TranscriptionError>;
}

/// Produces a story and a character description from a prompt.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, GenerationError>;
}

/// Produces raw image bytes from a textual description.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        description: &str,
        kind: ImageKind,
    ) -> Result<Vec<u8>, ImageGenerationError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
