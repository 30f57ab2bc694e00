//! Wiring of all pipeline components around one set of [`Stores`].

use std::sync::Arc;

use callroute_core::routing::{RandomDraw, RoutingDraw};
use callroute_db::models::dead_letter::DeadLetter;
use callroute_db::models::job::Job;
use callroute_db::Stores;
use callroute_provider::TranscriptionProvider;
use serde::Serialize;

use crate::admission::AdmissionController;
use crate::config::PipelineConfig;
use crate::processing::{LoggingProcessor, ProcessingWorker, ResultProcessor};
use crate::router::CallRouter;
use crate::submission::SubmissionWorker;
use crate::webhook::WebhookReceiver;

/// The assembled pipeline. Share it behind an `Arc`.
pub struct Pipeline {
    pub stores: Stores,
    pub admission: Arc<AdmissionController>,
    pub router: CallRouter,
    pub submission: SubmissionWorker,
    pub webhook: WebhookReceiver,
    pub processing: ProcessingWorker,
    pub config: PipelineConfig,
}

/// Point-in-time view of the whole pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub support_call_db: Vec<Job>,
    pub submission_queue: Vec<String>,
    pub processing_queue: Vec<String>,
    pub dead_letters: Vec<DeadLetter>,
    pub in_flight: usize,
    pub reserved: usize,
    pub max_concurrent: usize,
}

impl Pipeline {
    pub fn builder(
        config: PipelineConfig,
        provider: Arc<dyn TranscriptionProvider>,
    ) -> PipelineBuilder {
        PipelineBuilder {
            config,
            provider,
            draw: Arc::new(RandomDraw),
            processor: Arc::new(LoggingProcessor),
        }
    }

    /// Copy of every record, both queues and the dead letters.
    ///
    /// Each part is read under its own lock, so the parts may reflect
    /// slightly different instants while workers are running.
    pub async fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            support_call_db: self.stores.jobs.snapshot().await,
            submission_queue: self.stores.submission_queue.snapshot().await,
            processing_queue: self.stores.processing_queue.snapshot().await,
            dead_letters: self.stores.dead_letters.list().await,
            in_flight: self.admission.in_flight().await,
            reserved: self.admission.reserved(),
            max_concurrent: self.admission.max_concurrent(),
        }
    }
}

pub struct PipelineBuilder {
    config: PipelineConfig,
    provider: Arc<dyn TranscriptionProvider>,
    draw: Arc<dyn RoutingDraw>,
    processor: Arc<dyn ResultProcessor>,
}

impl PipelineBuilder {
    /// Replace the random routing draw.
    pub fn draw(mut self, draw: Arc<dyn RoutingDraw>) -> Self {
        self.draw = draw;
        self
    }

    /// Replace the default logging result processor.
    pub fn processor(mut self, processor: Arc<dyn ResultProcessor>) -> Self {
        self.processor = processor;
        self
    }

    pub fn build(self) -> Pipeline {
        let config = self.config;
        let stores = Stores::new(config.dead_letter_capacity);
        let admission = Arc::new(AdmissionController::new(
            Arc::clone(&stores.jobs),
            config.max_concurrent,
        ));

        let router = CallRouter::new(
            stores.clone(),
            self.draw,
            config.routing_percent,
            config.duplicate_policy,
        );
        let submission = SubmissionWorker::new(
            stores.clone(),
            Arc::clone(&admission),
            self.provider,
            config.callback_url.clone(),
        );
        let webhook = WebhookReceiver::new(
            stores.clone(),
            config.webhook_secret.clone(),
            config.webhook_max_body_bytes,
        );
        let processing = ProcessingWorker::new(stores.clone(), self.processor);

        Pipeline {
            stores,
            admission,
            router,
            submission,
            webhook,
            processing,
            config,
        }
    }
}
