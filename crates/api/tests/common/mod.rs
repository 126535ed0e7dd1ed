//! Shared test harness: the production router with fake provider adapters
//! and a temporary media directory.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use storygen_api::config::ServerConfig;
use storygen_api::router::build_app_router;
use storygen_api::state::AppState;
use storygen_core::MediaStore;
use storygen_pipeline::adapters::{
    AudioFormat, GeneratedText, GenerationError, ImageGenerationError, ImageGenerator, ImageKind,
    StoryGenerator, Transcriber, TranscriptionError,
};
use storygen_pipeline::StoryPipeline;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fake adapters (instant, deterministic)
// ---------------------------------------------------------------------------

pub struct FakeTranscriber;

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _format: AudioFormat,
    ) -> Result<String, TranscriptionError> {
        Ok("A brave knight discovers a magical forest".to_string())
    }
}

pub struct FakeStoryGenerator;

#[async_trait]
impl StoryGenerator for FakeStoryGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, GenerationError> {
        Ok(GeneratedText {
            story: format!("Deep in a forest: {prompt}"),
            character_description: "A wizard with a long silver beard".to_string(),
        })
    }
}

pub struct FakeImageGenerator;

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(
        &self,
        _description: &str,
        kind: ImageKind,
    ) -> Result<Vec<u8>, ImageGenerationError> {
        let (w, h) = match kind {
            ImageKind::Character => (32, 40),
            ImageKind::Background => (48, 36),
        };
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            w,
            h,
            image::Rgba([120, 60, 30, 255]),
        ));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_string(),
    }
}

/// The router under test plus the media store backing it. The temp dir
/// lives as long as this struct.
pub struct TestApp {
    pub router: Router,
    pub media: MediaStore,
    _dir: TempDir,
}

/// Build the full application router with all middleware layers, fake
/// provider adapters, and a temporary media directory.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub async fn build_test_app(pool: PgPool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path().to_str().unwrap());

    let media = MediaStore::new(dir.path());
    media.ensure_dirs().await.unwrap();

    let pipeline = Arc::new(StoryPipeline::new(
        pool.clone(),
        media.clone(),
        Arc::new(FakeTranscriber),
        Arc::new(FakeStoryGenerator),
        Arc::new(FakeImageGenerator),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media: media.clone(),
        pipeline,
    };

    TestApp {
        router: build_app_router(state, &config),
        media,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// POST a multipart body with a single `audio` file field.
pub async fn post_audio(app: &TestApp, filename: &str, bytes: &[u8]) -> Response<Body> {
    let boundary = "test-boundary-7f3a";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"audio\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/stories/audio")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll the status endpoint until the run reaches a terminal status.
///
/// The fake adapters return instantly, so a handful of scheduler yields is
/// plenty; panics if the run is still in flight after the deadline.
pub async fn poll_until_terminal(app: &TestApp, id: &str) -> serde_json::Value {
    for _ in 0..500 {
        let response = get(app, &format!("/api/v1/stories/{id}/status")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let status = json["data"]["status"].as_str().unwrap().to_string();
        if status == "completed" || status == "failed" {
            return json;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("run for story {id} did not reach a terminal status");
}
