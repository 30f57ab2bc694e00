use axum::extract::State;
use axum::Json;
use callroute_pipeline::PipelineSnapshot;

use crate::state::AppState;

/// GET /api/observability
///
/// Read-only view of the store, both queues, dead letters and admission counters.
pub async fn snapshot(State(state): State<AppState>) -> Json<PipelineSnapshot> {
    Json(state.pipeline.snapshot().await)
}
