//! Route definitions for the `/stories` resource.
//!
//! ```text
//! POST   /                 submit_story
//! POST   /audio            submit_audio_story
//! GET    /                 list_stories
//! GET    /{id}             get_story
//! GET    /{id}/status      story_status
//! DELETE /{id}             delete_story
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stories;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(stories::submit_story).get(stories::list_stories))
        .route("/audio", post(stories::submit_audio_story))
        .route(
            "/{id}",
            get(stories::get_story).delete(stories::delete_story),
        )
        .route("/{id}/status", get(stories::story_status))
}
