//! Integration tests for the story endpoints: submission (typed and audio),
//! status polling, gallery listing, detail, and deletion.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, poll_until_terminal, post_audio, post_json};
use serde_json::json;
use sqlx::PgPool;
use storygen_core::storage::IMAGE_DIR;

/// Submit a typed prompt and return the new record's id.
async fn submit(app: &common::TestApp, prompt: &str) -> String {
    let response = post_json(app, "/api/v1/stories", json!({ "prompt": prompt })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Test: valid prompt runs to completion with all content populated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn typed_prompt_runs_to_completion(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = post_json(
        &app,
        "/api/v1/stories",
        json!({ "prompt": "A dragon who collects teacups" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["prompt"], "A dragon who collects teacups");
    assert_eq!(json["data"]["status"], "pending");
    assert!(json["data"]["composite_image_url"].is_null());

    let id = json["data"]["id"].as_str().unwrap().to_string();
    let status = poll_until_terminal(&app, &id).await;

    assert_eq!(status["data"]["status"], "completed");
    assert!(status["data"]["error_message"].is_null());
    assert!(status["data"]["story"]
        .as_str()
        .unwrap()
        .contains("A dragon who collects teacups"));
    assert_eq!(
        status["data"]["character_description"],
        "A wizard with a long silver beard"
    );
    let composite_url = status["data"]["composite_image_url"].as_str().unwrap();
    assert!(composite_url.starts_with("/media/generated_images/"));

    // The detail view resolves all three image URLs, and the files exist.
    let detail = body_json(get(&app, &format!("/api/v1/stories/{id}")).await).await;
    for field in ["character_image", "background_image", "composite_image"] {
        let filename = detail["data"][field].as_str().unwrap();
        assert!(
            app.media.root().join(IMAGE_DIR).join(filename).exists(),
            "{field} file should be on disk"
        );
    }
}

// ---------------------------------------------------------------------------
// Test: invalid prompts are rejected before any record exists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_prompt_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let too_long = "x".repeat(1001);
    for prompt in ["", "   ", too_long.as_str()] {
        let response = post_json(&app, "/api/v1/stories", json!({ "prompt": prompt })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // No record was created for any rejected submission.
    let list = body_json(get(&app, "/api/v1/stories?completed=false").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Test: audio submission transcribes and runs to completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn audio_submission_transcribes_and_completes(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = post_audio(&app, "recording.wav", b"RIFF....WAVEfmt ").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    // The placeholder prompt holds the slot until transcription replaces it.
    assert_eq!(json["data"]["prompt"], "Audio input provided");

    let id = json["data"]["id"].as_str().unwrap().to_string();
    let status = poll_until_terminal(&app, &id).await;
    assert_eq!(status["data"]["status"], "completed");

    // The transcript replaced the placeholder and drove the generation.
    let detail = body_json(get(&app, &format!("/api/v1/stories/{id}")).await).await;
    assert_eq!(
        detail["data"]["prompt"],
        "A brave knight discovers a magical forest"
    );
    assert!(status["data"]["story"]
        .as_str()
        .unwrap()
        .contains("A brave knight discovers a magical forest"));
}

// ---------------------------------------------------------------------------
// Test: unsupported audio format is accepted at upload but fails the run
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_audio_format_fails_the_run(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = post_audio(&app, "tune.mid", b"MThd").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let status = poll_until_terminal(&app, &id).await;
    assert_eq!(status["data"]["status"], "failed");
    let message = status["data"]["error_message"].as_str().unwrap();
    assert!(
        message.starts_with("TranscriptionError:"),
        "unexpected error message: {message}"
    );

    // Failed runs expose no content through the polling endpoint.
    assert!(status["data"].get("story").is_none() || status["data"]["story"].is_null());
    assert!(
        status["data"].get("composite_image_url").is_none()
            || status["data"]["composite_image_url"].is_null()
    );
}

// ---------------------------------------------------------------------------
// Test: audio upload without file content is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_audio_upload_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = post_audio(&app, "silence.wav", b"").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: gallery listing defaults to completed records, newest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_lists_completed_records_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let first = submit(&app, "The first tale").await;
    poll_until_terminal(&app, &first).await;
    let second = submit(&app, "The second tale").await;
    poll_until_terminal(&app, &second).await;

    // One failed record, which the gallery must not show by default.
    let failed_response = post_audio(&app, "broken.mid", b"MThd").await;
    let failed_json = body_json(failed_response).await;
    let failed = failed_json["data"]["id"].as_str().unwrap().to_string();
    poll_until_terminal(&app, &failed).await;

    let list = body_json(get(&app, "/api/v1/stories").await).await;
    let items = list["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], second.as_str());
    assert_eq!(items[1]["id"], first.as_str());
    for item in items {
        assert_eq!(item["status"], "completed");
    }

    // completed=false lifts the filter and includes the failed record.
    let all = body_json(get(&app, "/api/v1/stories?completed=false").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Test: unknown ids return 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_story_id_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let missing = "00000000-0000-0000-0000-000000000000";

    for uri in [
        format!("/api/v1/stories/{missing}"),
        format!("/api/v1/stories/{missing}/status"),
    ] {
        let response = get(&app, &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = delete(&app, &format!("/api/v1/stories/{missing}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: deletion removes the record and its media files
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_record_and_media(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let id = submit(&app, "A story soon deleted").await;
    poll_until_terminal(&app, &id).await;

    let detail = body_json(get(&app, &format!("/api/v1/stories/{id}")).await).await;
    let image_paths: Vec<_> = ["character_image", "background_image", "composite_image"]
        .iter()
        .map(|field| {
            app.media
                .root()
                .join(IMAGE_DIR)
                .join(detail["data"][*field].as_str().unwrap())
        })
        .collect();
    for path in &image_paths {
        assert!(path.exists());
    }

    let response = delete(&app, &format!("/api/v1/stories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for path in &image_paths {
        assert!(!path.exists(), "{} should be deleted", path.display());
    }

    // The record is gone for every subsequent request.
    let response = get(&app, &format!("/api/v1/stories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(&app, &format!("/api/v1/stories/{id}/status")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
