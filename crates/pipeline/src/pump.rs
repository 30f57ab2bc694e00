//! Optional in-process driver for the two workers.
//!
//! Polls every `interval` and runs one submission and one processing step
//! per tick. Without a pump the workers only run when their HTTP endpoints
//! are hit by an external scheduler.

use std::sync::Arc;
use std::time::Duration;

use callroute_core::error::CoreError;
use tokio_util::sync::CancellationToken;

use crate::pipeline::Pipeline;

pub struct WorkerPump {
    pipeline: Arc<Pipeline>,
    interval: Duration,
}

impl WorkerPump {
    pub fn new(pipeline: Arc<Pipeline>, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    /// Run the pump loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            poll_interval_ms = self.interval.as_millis() as u64,
            "Worker pump started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Worker pump shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One cycle: at most one submission and at most one processed call.
    pub async fn tick(&self) {
        if let Err(e) = self.pipeline.submission.submit_next().await {
            log_step_error("submission", &e);
        }
        if let Err(e) = self.pipeline.processing.process_next().await {
            log_step_error("processing", &e);
        }
    }
}

fn log_step_error(step: &'static str, err: &CoreError) {
    match err {
        CoreError::QueueEmpty { .. } | CoreError::AdmissionDenied => {
            tracing::debug!(step, reason = %err, "Nothing to do");
        }
        other => {
            tracing::warn!(step, error = %other, "Worker step failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use callroute_core::routing::FixedDraw;
    use callroute_core::status::JobStatus;
    use callroute_db::models::job::CreateJob;
    use callroute_provider::{ListenRequest, ProviderError, SubmitAck, TranscriptionProvider};

    use super::*;
    use crate::config::PipelineConfig;

    struct AckProvider;

    #[async_trait]
    impl TranscriptionProvider for AckProvider {
        async fn submit(&self, _request: &ListenRequest) -> Result<SubmitAck, ProviderError> {
            Ok(SubmitAck {
                request_id: "R1".into(),
            })
        }
    }

    fn pipeline() -> Arc<Pipeline> {
        Arc::new(
            Pipeline::builder(PipelineConfig::default(), Arc::new(AckProvider))
                .draw(Arc::new(FixedDraw(0.0)))
                .build(),
        )
    }

    #[tokio::test]
    async fn tick_submits_queued_call() {
        let pipeline = pipeline();
        pipeline
            .router
            .route(CreateJob {
                id: "A".into(),
                url: "https://audio/a.wav".into(),
                keyterms: vec![],
                tags: vec![],
            })
            .await
            .unwrap();

        WorkerPump::new(Arc::clone(&pipeline), Duration::from_millis(10))
            .tick()
            .await;

        let job = pipeline.stores.jobs.get("A").await.unwrap();
        assert_eq!(job.status, JobStatus::Transcribing);
        assert_eq!(job.provider_request_id.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn tick_on_idle_pipeline_changes_nothing() {
        let pipeline = pipeline();
        WorkerPump::new(Arc::clone(&pipeline), Duration::from_millis(10))
            .tick()
            .await;

        assert!(pipeline.stores.jobs.is_empty().await);
        assert!(pipeline.stores.dead_letters.is_empty().await);
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let pump = WorkerPump::new(pipeline(), Duration::from_millis(5));
        let cancel = CancellationToken::new();
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), pump.run(cancel))
            .await
            .expect("pump should exit after cancellation");
    }
}
