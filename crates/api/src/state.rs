use std::sync::Arc;

use callroute_pipeline::Pipeline;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Store, queues and workers of the transcription pipeline.
    pub pipeline: Arc<Pipeline>,
}
