//! Handler for the migration router: intake of new support calls.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use callroute_db::models::job::CreateJob;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RouteCallResponse {
    pub message: &'static str,
    pub id: String,
    pub url: String,
}

/// POST /api/migration-router
///
/// Store a support call and, depending on the routing draw, enqueue it for
/// provider submission. Returns 201 in every accepted case.
pub async fn route_call(
    State(state): State<AppState>,
    payload: Result<Json<CreateJob>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RouteCallResponse>)> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let routed = state.pipeline.router.route(input).await?;

    let message = if routed.duplicate_ignored {
        "Support call already exists"
    } else if routed.routed {
        "Support call routed to Deepgram"
    } else {
        "Support call stored"
    };

    Ok((
        StatusCode::CREATED,
        Json(RouteCallResponse {
            message,
            id: routed.id,
            url: routed.url,
        }),
    ))
}
