use std::sync::Arc;

use storygen_core::MediaStore;
use storygen_pipeline::StoryPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: storygen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Media file store for uploads and generated images.
    pub media: MediaStore,
    /// The story generation pipeline, spawned per submitted run.
    pub pipeline: Arc<StoryPipeline>,
}
