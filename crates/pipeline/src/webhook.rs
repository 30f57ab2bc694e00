//! Inbound provider callbacks.
//!
//! The receiver authenticates the shared-secret header, correlates the
//! callback with its support call by provider request id, stores the raw
//! result and enqueues the call for processing. Unknown request ids are
//! acknowledged without effect so the provider does not keep retrying.

use callroute_core::error::CoreError;
use callroute_core::secret::secrets_match;
use callroute_core::types::JobId;
use callroute_core::webhook::parse_callback;
use callroute_db::repositories::Correlation;
use callroute_db::Stores;

/// Name of the shared-secret header sent by the provider.
pub const SECRET_HEADER: &str = "dg-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Result stored; the call is now `Processing` and queued.
    Accepted { job_id: JobId, request_id: String },
    /// No support call carries this request id.
    Unmatched { request_id: String },
    /// The call already received its result; nothing changed.
    Duplicate { job_id: JobId, request_id: String },
}

pub struct WebhookReceiver {
    stores: Stores,
    secret: String,
    max_body_bytes: usize,
}

impl WebhookReceiver {
    pub fn new(stores: Stores, secret: String, max_body_bytes: usize) -> Self {
        Self {
            stores,
            secret,
            max_body_bytes,
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Check the shared-secret header value.
    pub fn authenticate(&self, provided: Option<&str>) -> Result<(), CoreError> {
        if secrets_match(&self.secret, provided) {
            Ok(())
        } else {
            tracing::warn!("Webhook authentication failed: invalid or missing {SECRET_HEADER}");
            Err(CoreError::Unauthorized)
        }
    }

    /// Authenticate, then accept the body.
    pub async fn receive(
        &self,
        provided_secret: Option<&str>,
        body: &[u8],
    ) -> Result<WebhookOutcome, CoreError> {
        self.authenticate(provided_secret)?;
        self.accept(body).await
    }

    /// Validate and correlate an already authenticated callback body.
    pub async fn accept(&self, body: &[u8]) -> Result<WebhookOutcome, CoreError> {
        let payload = parse_callback(body, self.max_body_bytes)?;
        let request_id = payload.request_id;

        match self
            .stores
            .jobs
            .mark_processing(&request_id, payload.raw)
            .await?
        {
            Correlation::Matched(job) => {
                let depth = self.stores.processing_queue.push(job.id.clone()).await;
                tracing::info!(
                    job_id = %job.id,
                    request_id = %request_id,
                    queue_depth = depth,
                    "Provider result received",
                );
                Ok(WebhookOutcome::Accepted {
                    job_id: job.id,
                    request_id,
                })
            }
            Correlation::Unmatched => {
                tracing::error!(request_id = %request_id, "No matching support call for request id");
                Ok(WebhookOutcome::Unmatched { request_id })
            }
            Correlation::AlreadyReceived(job) => {
                tracing::info!(
                    job_id = %job.id,
                    request_id = %request_id,
                    status = %job.status,
                    "Duplicate provider callback ignored",
                );
                Ok(WebhookOutcome::Duplicate {
                    job_id: job.id,
                    request_id,
                })
            }
        }
    }
}
