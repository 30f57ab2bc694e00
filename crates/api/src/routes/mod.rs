pub mod health;
pub mod pipeline;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /migration-router                  route a new support call (POST)
/// /dg-submission-worker              submit next queued call (GET)
/// /dg-webhook                        provider callback (POST, dg-token header)
/// /dg-processing-worker              process next received call (GET)
/// /observability                     pipeline snapshot (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(pipeline::router())
}
