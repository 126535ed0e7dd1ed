use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the media directories exist and are writable targets.
    pub media_ready: bool,
}

/// GET /health -- returns service, database, and media store health.
///
/// The service is `degraded` when either dependency is unavailable; runs
/// submitted in that state would fail, so callers should back off.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = storygen_db::health_check(&state.pool).await.is_ok();
    let media_ready = state.media.is_ready().await;

    let status = if db_healthy && media_ready {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_ready,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
