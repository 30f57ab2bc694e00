//! Pull one support call from the submission queue and hand it to the provider.

use std::sync::Arc;

use callroute_core::error::CoreError;
use callroute_core::status::JobStatus;
use callroute_core::types::{JobId, QueueKind};
use callroute_db::models::dead_letter::{DeadLetter, DeadLetterReason};
use callroute_db::Stores;
use callroute_provider::{ListenRequest, TranscriptionProvider};

use crate::admission::AdmissionController;

/// A support call accepted by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub job_id: JobId,
    pub request_id: String,
}

pub struct SubmissionWorker {
    stores: Stores,
    admission: Arc<AdmissionController>,
    provider: Arc<dyn TranscriptionProvider>,
    callback_url: String,
}

impl SubmissionWorker {
    pub fn new(
        stores: Stores,
        admission: Arc<AdmissionController>,
        provider: Arc<dyn TranscriptionProvider>,
        callback_url: String,
    ) -> Self {
        Self {
            stores,
            admission,
            provider,
            callback_url,
        }
    }

    /// Process at most one support call.
    ///
    /// Steps: reserve an admission slot, pop the queue head, look the call
    /// up, submit it (no lock held), then record the request id and move to
    /// `Transcribing`. A call the provider refuses stays `Created` and is
    /// dead-lettered; it is not requeued.
    pub async fn submit_next(&self) -> Result<Submitted, CoreError> {
        let Some(permit) = self.admission.try_reserve().await else {
            tracing::warn!(
                max_concurrent = self.admission.max_concurrent(),
                "Provider max concurrent requests reached",
            );
            return Err(CoreError::AdmissionDenied);
        };

        let id = self
            .stores
            .submission_queue
            .pop()
            .await
            .ok_or(CoreError::QueueEmpty {
                queue: QueueKind::Submission,
            })?;

        let Some(job) = self.stores.jobs.get(&id).await else {
            self.stores
                .dead_letters
                .record(DeadLetter::new(
                    id.clone(),
                    QueueKind::Submission,
                    DeadLetterReason::JobNotFound,
                ))
                .await;
            return Err(CoreError::JobNotFound { id });
        };

        if job.status != JobStatus::Created {
            tracing::warn!(job_id = %id, status = %job.status, "Skipping already submitted support call");
            return Err(CoreError::InvalidTransition {
                id,
                from: job.status,
                to: JobStatus::Transcribing,
            });
        }

        let request = ListenRequest::new(job.url.clone(), self.callback_url.clone())
            .with_keyterms(job.keyterms.clone());

        let ack = match self.provider.submit(&request).await {
            Ok(ack) => ack,
            Err(e) => {
                tracing::error!(
                    job_id = %id,
                    rate_limited = e.is_rate_limited(),
                    error = %e,
                    "Failed to submit support call to provider",
                );
                self.stores
                    .dead_letters
                    .record(
                        DeadLetter::new(
                            id.clone(),
                            QueueKind::Submission,
                            DeadLetterReason::ProviderRejected,
                        )
                        .with_detail(e.to_string()),
                    )
                    .await;
                return Err(CoreError::ProviderSubmissionFailed(e.to_string()));
            }
        };

        if let Err(e) = self
            .stores
            .jobs
            .mark_transcribing(&id, &ack.request_id)
            .await
        {
            tracing::error!(
                job_id = %id,
                request_id = %ack.request_id,
                error = %e,
                "Provider accepted support call but the store refused it",
            );
            self.stores
                .dead_letters
                .record(
                    DeadLetter::new(
                        id.clone(),
                        QueueKind::Submission,
                        DeadLetterReason::TransitionFailed,
                    )
                    .with_detail(format!("request_id={}: {e}", ack.request_id)),
                )
                .await;
            return Err(e);
        }
        drop(permit);

        tracing::info!(job_id = %id, request_id = %ack.request_id, "Support call submitted to provider");

        Ok(Submitted {
            job_id: id,
            request_id: ack.request_id,
        })
    }
}
