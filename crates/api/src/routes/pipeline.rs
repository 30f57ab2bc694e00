//! Route definitions for the transcription pipeline endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{calls, observability, webhook, workers};
use crate::state::AppState;

/// Pipeline routes, mounted under `/api`.
///
/// ```text
/// POST   /migration-router        -> calls::route_call
/// GET    /dg-submission-worker    -> workers::run_submission
/// POST   /dg-webhook              -> webhook::receive
/// GET    /dg-processing-worker    -> workers::run_processing
/// GET    /observability           -> observability::snapshot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/migration-router", post(calls::route_call))
        .route("/dg-submission-worker", get(workers::run_submission))
        .route("/dg-webhook", post(webhook::receive))
        .route("/dg-processing-worker", get(workers::run_processing))
        .route("/observability", get(observability::snapshot))
}
