//! Boundary validation for provider callback payloads.
//!
//! The payload is stored opaquely once accepted; the only structure relied on
//! is the correlation key at `metadata.request_id`.

use crate::error::CoreError;

/// A callback payload that passed boundary validation.
#[derive(Debug, Clone)]
pub struct CallbackPayload {
    /// Provider request identifier from `metadata.request_id`.
    pub request_id: String,
    /// The full payload, kept verbatim.
    pub raw: serde_json::Value,
}

/// Parse and validate a raw callback body.
///
/// Rejects bodies larger than `max_bytes` with [`CoreError::PayloadTooLarge`].
/// Any other malformation is reported as [`CoreError::Internal`], matching the
/// provider contract where only authentication failures are distinguished.
pub fn parse_callback(body: &[u8], max_bytes: usize) -> Result<CallbackPayload, CoreError> {
    if body.len() > max_bytes {
        return Err(CoreError::PayloadTooLarge { limit: max_bytes });
    }

    let raw: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| CoreError::Internal(format!("Callback body is not valid JSON: {e}")))?;

    let request_id = extract_request_id(&raw)?.to_string();

    Ok(CallbackPayload { request_id, raw })
}

/// Extract the correlation key from a callback payload.
pub fn extract_request_id(payload: &serde_json::Value) -> Result<&str, CoreError> {
    if !payload.is_object() {
        return Err(CoreError::Internal(
            "Callback body must be a JSON object".into(),
        ));
    }

    payload
        .get("metadata")
        .and_then(|m| m.get("request_id"))
        .and_then(|v| v.as_str())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CoreError::Internal("Callback body is missing metadata.request_id".into()))
}
