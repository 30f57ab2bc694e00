//! Pull one support call from the processing queue and finish it.

use std::sync::Arc;

use async_trait::async_trait;
use callroute_core::error::CoreError;
use callroute_core::types::QueueKind;
use callroute_db::models::dead_letter::{DeadLetter, DeadLetterReason};
use callroute_db::models::job::Job;
use callroute_db::Stores;

/// Post-processing of a stored provider result (accuracy scoring, format
/// translation for downstream systems). Runs before the terminal transition.
#[async_trait]
pub trait ResultProcessor: Send + Sync {
    async fn process(&self, job: &Job) -> Result<(), CoreError>;
}

/// Default processor: logs what would be processed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProcessor;

#[async_trait]
impl ResultProcessor for LoggingProcessor {
    async fn process(&self, job: &Job) -> Result<(), CoreError> {
        let result_bytes = job
            .provider_result
            .as_ref()
            .and_then(|r| serde_json::to_vec(r).ok())
            .map_or(0, |bytes| bytes.len());
        tracing::debug!(job_id = %job.id, result_bytes, "Provider result ready for post-processing");
        Ok(())
    }
}

pub struct ProcessingWorker {
    stores: Stores,
    processor: Arc<dyn ResultProcessor>,
}

impl ProcessingWorker {
    pub fn new(stores: Stores, processor: Arc<dyn ResultProcessor>) -> Self {
        Self { stores, processor }
    }

    /// Process at most one support call, returning it in `Processed` status.
    pub async fn process_next(&self) -> Result<Job, CoreError> {
        let id = self
            .stores
            .processing_queue
            .pop()
            .await
            .ok_or(CoreError::QueueEmpty {
                queue: QueueKind::Processing,
            })?;

        let Some(job) = self.stores.jobs.get(&id).await else {
            self.stores
                .dead_letters
                .record(DeadLetter::new(
                    id.clone(),
                    QueueKind::Processing,
                    DeadLetterReason::JobNotFound,
                ))
                .await;
            return Err(CoreError::JobNotFound { id });
        };

        if let Err(e) = self.processor.process(&job).await {
            self.stores
                .dead_letters
                .record(
                    DeadLetter::new(
                        id.clone(),
                        QueueKind::Processing,
                        DeadLetterReason::ProcessingFailed,
                    )
                    .with_detail(e.to_string()),
                )
                .await;
            return Err(e);
        }

        let job = match self.stores.jobs.mark_processed(&id).await {
            Ok(job) => job,
            Err(e) => {
                let detail = match &job.provider_request_id {
                    Some(request_id) => format!("request_id={request_id}: {e}"),
                    None => e.to_string(),
                };
                self.stores
                    .dead_letters
                    .record(
                        DeadLetter::new(
                            id.clone(),
                            QueueKind::Processing,
                            DeadLetterReason::TransitionFailed,
                        )
                        .with_detail(detail),
                    )
                    .await;
                return Err(e);
            }
        };
        tracing::info!(job_id = %job.id, "Support call processed");
        Ok(job)
    }
}
