//! Records of support calls the pipeline could not carry forward.

use callroute_core::types::{JobId, QueueKind, Timestamp};
use serde::Serialize;

/// Why a support call was dead-lettered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadLetterReason {
    /// An id was popped from a queue but no record exists for it.
    JobNotFound,
    /// The provider refused the submission; the call stays `Created`.
    ProviderRejected,
    /// Post-processing of the provider result failed.
    ProcessingFailed,
    /// The store refused the status transition after the id left its queue.
    TransitionFailed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetter {
    pub job_id: JobId,
    pub source: QueueKind,
    pub reason: DeadLetterReason,
    pub detail: Option<String>,
    pub recorded_at: Timestamp,
}

impl DeadLetter {
    pub fn new(job_id: impl Into<JobId>, source: QueueKind, reason: DeadLetterReason) -> Self {
        Self {
            job_id: job_id.into(),
            source,
            reason,
            detail: None,
            recorded_at: chrono::Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
