//! Gemini `generateContent` client: text generation and audio transcription.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use storygen_pipeline::adapters::{
    AudioFormat, GeneratedText, GenerationError, StoryGenerator, Transcriber, TranscriptionError,
};
use storygen_pipeline::prompts;

use crate::config::ProviderConfig;

/// Sampling temperature for both generation calls.
const TEMPERATURE: f32 = 0.7;
/// Output token cap for both generation calls.
const MAX_OUTPUT_TOKENS: u32 = 1000;
/// Instruction sent alongside the audio payload for transcription.
const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe this audio recording. Return only the transcript text.";

/// HTTP client for the Gemini REST API.
///
/// One instance serves both the text generation and transcription adapters;
/// the underlying `reqwest::Client` is cheaply cloneable.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from provider configuration.
    pub fn new(config: &ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.text_timeout_secs))
            .build()
            .expect("Failed to build Gemini HTTP client");

        Self {
            http,
            base_url: config.gemini_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Issue one `generateContent` call and return the first candidate's text.
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, GeminiCallError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiCallError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiCallError::Status(status.as_u16()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiCallError::Malformed(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| GeminiCallError::Malformed("response has no text part".into()))?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(GeminiCallError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl StoryGenerator for GeminiClient {
    /// Two chained calls: story from the user's prompt, then character
    /// description from the story.
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, GenerationError> {
        let story = self
            .generate_content(vec![Part::text(prompts::story_prompt(prompt))])
            .await
            .map_err(GeminiCallError::into_generation)?;

        tracing::debug!(chars = story.len(), "Gemini story generated");

        let character_description = self
            .generate_content(vec![Part::text(prompts::character_prompt(&story))])
            .await
            .map_err(GeminiCallError::into_generation)?;

        Ok(GeneratedText {
            story,
            character_description,
        })
    }
}

#[async_trait]
impl Transcriber for GeminiClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<String, TranscriptionError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(audio);
        let parts = vec![
            Part::text(TRANSCRIBE_INSTRUCTION.to_string()),
            Part::inline_data(format.mime_type().to_string(), encoded),
        ];

        let transcript = self
            .generate_content(parts)
            .await
            .map_err(GeminiCallError::into_transcription)?;

        tracing::debug!(chars = transcript.len(), "Gemini transcription produced");
        Ok(transcript)
    }
}

// ---------------------------------------------------------------------------
// Call errors
// ---------------------------------------------------------------------------

/// A single `generateContent` call failure, before mapping onto the adapter
/// taxonomy of the calling trait.
enum GeminiCallError {
    Transport(String),
    Status(u16),
    Malformed(String),
    Empty,
}

impl GeminiCallError {
    fn into_generation(self) -> GenerationError {
        match self {
            GeminiCallError::Transport(msg) => GenerationError::Service(msg),
            GeminiCallError::Status(code) => {
                GenerationError::Service(format!("Gemini returned status {code}"))
            }
            GeminiCallError::Malformed(msg) => GenerationError::MalformedResponse(msg),
            GeminiCallError::Empty => GenerationError::Empty,
        }
    }

    fn into_transcription(self) -> TranscriptionError {
        match self {
            GeminiCallError::Transport(msg) => TranscriptionError::Service(msg),
            GeminiCallError::Status(code) => {
                TranscriptionError::Service(format!("Gemini returned status {code}"))
            }
            GeminiCallError::Malformed(msg) => TranscriptionError::Service(msg),
            GeminiCallError::Empty => TranscriptionError::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: String, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData { mime_type, data }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
