//! Support call entity and its create DTO.

use callroute_core::status::JobStatus;
use callroute_core::types::{JobId, Timestamp};
use serde::{Deserialize, Serialize};

/// A support call tracked through the transcription pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub url: String,
    pub keyterms: Vec<String>,
    pub tags: Vec<String>,
    pub status: JobStatus,
    /// Correlation key assigned by the provider on submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_request_id: Option<String>,
    /// Raw callback payload, set once by the webhook receiver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_result: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Build a fresh `Created` record from the router input.
    pub fn new(input: CreateJob) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: input.id,
            url: input.url,
            keyterms: input.keyterms,
            tags: input.tags,
            status: JobStatus::Created,
            provider_request_id: None,
            provider_result: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for `POST /api/migration-router`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub id: JobId,
    pub url: String,
    pub keyterms: Vec<String>,
    pub tags: Vec<String>,
}
