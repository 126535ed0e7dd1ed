//! Provider configuration loaded from environment variables.

/// Connection settings for the external generation services.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Gemini API key (required).
    pub gemini_api_key: String,
    /// Gemini API base URL.
    pub gemini_base_url: String,
    /// Gemini model name used for both generation and transcription.
    pub gemini_model: String,
    /// Pollinations image API base URL.
    pub pollinations_base_url: String,
    /// Timeout for text generation and transcription calls, in seconds.
    pub text_timeout_secs: u64,
    /// Timeout for image generation calls, in seconds.
    pub image_timeout_secs: u64,
}

impl ProviderConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                      |
    /// |-------------------------|----------------------------------------------|
    /// | `GEMINI_API_KEY`        | (required)                                   |
    /// | `GEMINI_BASE_URL`       | `https://generativelanguage.googleapis.com`  |
    /// | `GEMINI_MODEL`          | `gemini-1.5-flash`                           |
    /// | `POLLINATIONS_BASE_URL` | `https://image.pollinations.ai`              |
    /// | `TEXT_TIMEOUT_SECS`     | `60`                                         |
    /// | `IMAGE_TIMEOUT_SECS`    | `90`                                         |
    pub fn from_env() -> Self {
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let gemini_base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into());

        let pollinations_base_url = std::env::var("POLLINATIONS_BASE_URL")
            .unwrap_or_else(|_| "https://image.pollinations.ai".into());

        let text_timeout_secs: u64 = std::env::var("TEXT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("TEXT_TIMEOUT_SECS must be a valid u64");

        let image_timeout_secs: u64 = std::env::var("IMAGE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("IMAGE_TIMEOUT_SECS must be a valid u64");

        Self {
            gemini_api_key,
            gemini_base_url,
            gemini_model,
            pollinations_base_url,
            text_timeout_secs,
            image_timeout_secs,
        }
    }
}
