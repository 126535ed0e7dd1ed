//! Route definitions.

pub mod health;
pub mod stories;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /stories                submit (POST), gallery list (GET)
/// /stories/audio          submit with audio upload (POST)
/// /stories/{id}           detail (GET), delete (DELETE)
/// /stories/{id}/status    polling endpoint (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/stories", stories::router())
}
