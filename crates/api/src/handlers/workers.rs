//! Handlers that run one unit of worker work per request.
//!
//! An external scheduler (or the in-process pump) calls these repeatedly.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub message: &'static str,
    pub id: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessingResponse {
    pub message: &'static str,
    pub id: String,
}

/// GET /api/dg-submission-worker
///
/// Submit the next queued support call to the provider if admission allows.
pub async fn run_submission(State(state): State<AppState>) -> AppResult<Json<SubmissionResponse>> {
    let submitted = state.pipeline.submission.submit_next().await?;
    Ok(Json(SubmissionResponse {
        message: "Support call submitted to Deepgram",
        id: submitted.job_id,
        request_id: submitted.request_id,
    }))
}

/// GET /api/dg-processing-worker
pub async fn run_processing(State(state): State<AppState>) -> AppResult<Json<ProcessingResponse>> {
    let job = state.pipeline.processing.process_next().await?;
    Ok(Json(ProcessingResponse {
        message: "Support call processed",
        id: job.id,
    }))
}
