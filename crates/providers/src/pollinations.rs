//! Pollinations image API client.
//!
//! The API takes the prompt as a URL path segment:
//! `GET {base}/prompt/{prompt}?width=..&height=..&model=flux&seed=..`
//! and responds with raw image bytes.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use storygen_pipeline::adapters::{ImageGenerationError, ImageGenerator, ImageKind};
use url::Url;

use crate::config::ProviderConfig;

/// Fixed artistic suffix appended to every image prompt.
const PROMPT_ENHANCEMENT: &str =
    "beautiful digital art, cinematic lighting, fantasy illustration, high detail";

/// Model name requested from the service.
const MODEL: &str = "flux";

/// Seed range for generation variety; randomness only affects what the
/// external service paints.
const SEED_RANGE: std::ops::RangeInclusive<u32> = 1..=10_000;

/// HTTP client for the Pollinations image API.
#[derive(Clone)]
pub struct PollinationsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PollinationsClient {
    /// Build a client from provider configuration.
    pub fn new(config: &ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.image_timeout_secs))
            .build()
            .expect("Failed to build Pollinations HTTP client");

        Self {
            http,
            base_url: config.pollinations_base_url.clone(),
        }
    }

    /// Build the request URL with the prompt percent-encoded as a path
    /// segment.
    fn build_url(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        seed: u32,
    ) -> Result<Url, ImageGenerationError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ImageGenerationError::Service(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ImageGenerationError::Service("base URL cannot take a path".into()))?
            .push("prompt")
            .push(prompt);
        url.query_pairs_mut()
            .append_pair("width", &width.to_string())
            .append_pair("height", &height.to_string())
            .append_pair("model", MODEL)
            .append_pair("seed", &seed.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ImageGenerator for PollinationsClient {
    async fn generate(
        &self,
        description: &str,
        kind: ImageKind,
    ) -> Result<Vec<u8>, ImageGenerationError> {
        let prompt = format!("{description}, {PROMPT_ENHANCEMENT}");
        let (width, height) = kind.dimensions();
        let seed = rand::rng().random_range(SEED_RANGE);
        let url = self.build_url(&prompt, width, height, seed)?;

        tracing::info!(kind = kind.prefix(), width, height, seed, "Requesting image");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ImageGenerationError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageGenerationError::Status {
                kind: kind.prefix(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageGenerationError::Service(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ImageGenerationError::Empty);
        }

        tracing::info!(kind = kind.prefix(), bytes = bytes.len(), "Image received");
        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
