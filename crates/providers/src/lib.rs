//! Provider clients for the external generation services.
//!
//! [`GeminiClient`] implements both text generation and audio transcription
//! against the Gemini `generateContent` REST API; [`PollinationsClient`]
//! implements image generation against the Pollinations image API. Both are
//! thin translation layers: build the request, parse the response, map the
//! failure. No retry logic lives here.

pub mod config;
pub mod gemini;
pub mod pollinations;

pub use config::ProviderConfig;
pub use gemini::GeminiClient;
pub use pollinations::PollinationsClient;
