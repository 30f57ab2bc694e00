//! Handler for provider transcription callbacks.

use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use callroute_core::error::CoreError;
use callroute_pipeline::webhook::{WebhookOutcome, SECRET_HEADER};
use http_body_util::LengthLimitError;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
}

/// POST /api/dg-webhook
///
/// The shared secret is checked before the body is read. Callbacks for
/// unknown request ids are acknowledged with 200 so the provider does not
/// retry them.
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Json<WebhookResponse>> {
    let webhook = &state.pipeline.webhook;

    let provided = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    webhook.authenticate(provided)?;

    let limit = webhook.max_body_bytes();
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        if e.into_inner().is::<LengthLimitError>() {
            AppError::Core(CoreError::PayloadTooLarge { limit })
        } else {
            AppError::InternalError("Failed to read webhook body".into())
        }
    })?;

    let message = match webhook.accept(&bytes).await? {
        WebhookOutcome::Accepted { .. } => "Transcription received",
        WebhookOutcome::Unmatched { .. } => "No matching support call",
        WebhookOutcome::Duplicate { .. } => "Transcription already received",
    };

    Ok(Json(WebhookResponse { message }))
}
