//! Entry point for new support calls.
//!
//! Stores the call and makes an independent probabilistic decision whether
//! to send it to the provider pipeline, so traffic can be shifted gradually
//! away from the legacy transcription path.

use std::sync::Arc;

use callroute_core::error::CoreError;
use callroute_core::routing::{routes_to_provider, RoutingDraw, PROVIDER_TAG};
use callroute_core::types::{DuplicatePolicy, JobId};
use callroute_db::models::job::{CreateJob, Job};
use callroute_db::repositories::InsertOutcome;
use callroute_db::Stores;

/// Result of routing one support call.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCall {
    pub id: JobId,
    pub url: String,
    /// Whether the call was enqueued for provider submission.
    pub routed: bool,
    /// Whether an existing record with this id was kept unchanged.
    pub duplicate_ignored: bool,
}

pub struct CallRouter {
    stores: Stores,
    draw: Arc<dyn RoutingDraw>,
    routing_percent: f64,
    duplicate_policy: DuplicatePolicy,
}

impl CallRouter {
    pub fn new(
        stores: Stores,
        draw: Arc<dyn RoutingDraw>,
        routing_percent: f64,
        duplicate_policy: DuplicatePolicy,
    ) -> Self {
        Self {
            stores,
            draw,
            routing_percent,
            duplicate_policy,
        }
    }

    pub async fn route(&self, input: CreateJob) -> Result<RoutedCall, CoreError> {
        validate(&input)?;
        let url = input.url.clone();

        let outcome = self
            .stores
            .jobs
            .insert(Job::new(input), self.duplicate_policy)
            .await?;

        let id = outcome.job().id.clone();
        match &outcome {
            InsertOutcome::Ignored(_) => {
                tracing::info!(job_id = %id, "Duplicate support call id ignored");
                return Ok(RoutedCall {
                    id,
                    url,
                    routed: false,
                    duplicate_ignored: true,
                });
            }
            InsertOutcome::Replaced(_) => {
                tracing::warn!(job_id = %id, "Existing support call overwritten");
            }
            InsertOutcome::Created(_) => {
                tracing::info!(job_id = %id, "Support call stored");
            }
        }

        let draw = self.draw.draw();
        let routed = routes_to_provider(draw, self.routing_percent);
        if routed {
            self.stores.jobs.append_tag(&id, PROVIDER_TAG).await?;
            let depth = self.stores.submission_queue.push(id.clone()).await;
            tracing::info!(job_id = %id, draw, queue_depth = depth, "Support call routed to provider");
        } else {
            tracing::debug!(job_id = %id, draw, "Support call left on legacy path");
        }

        Ok(RoutedCall {
            id,
            url,
            routed,
            duplicate_ignored: false,
        })
    }
}

fn validate(input: &CreateJob) -> Result<(), CoreError> {
    if input.id.trim().is_empty() {
        return Err(CoreError::Validation("id must not be empty".into()));
    }
    if input.url.trim().is_empty() {
        return Err(CoreError::Validation("url must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use callroute_core::routing::FixedDraw;
    use callroute_core::status::JobStatus;

    use super::*;

    fn input(id: &str) -> CreateJob {
        CreateJob {
            id: id.to_string(),
            url: format!("https://audio/{id}.wav"),
            keyterms: vec!["refund".into()],
            tags: vec!["priority".into()],
        }
    }

    fn router(stores: &Stores, draw: f64, percent: f64, policy: DuplicatePolicy) -> CallRouter {
        CallRouter::new(stores.clone(), Arc::new(FixedDraw(draw)), percent, policy)
    }

    #[tokio::test]
    async fn draw_below_percent_enqueues_and_tags_once() {
        let stores = Stores::new(10);
        let routed = router(&stores, 10.0, 50.0, DuplicatePolicy::Reject)
            .route(input("A"))
            .await
            .unwrap();

        assert!(routed.routed);
        assert_eq!(routed.url, "https://audio/A.wav");
        assert_eq!(stores.submission_queue.snapshot().await, vec!["A".to_string()]);

        let job = stores.jobs.get("A").await.unwrap();
        assert_eq!(job.status, JobStatus::Created);
        assert_eq!(job.tags, vec!["priority", "deepgram"]);
        assert_eq!(job.tags.iter().filter(|t| *t == PROVIDER_TAG).count(), 1);
    }

    #[tokio::test]
    async fn draw_at_or_above_percent_leaves_queue_untouched() {
        let stores = Stores::new(10);
        let routed = router(&stores, 50.0, 50.0, DuplicatePolicy::Reject)
            .route(input("A"))
            .await
            .unwrap();

        assert!(!routed.routed);
        assert!(stores.submission_queue.is_empty().await);
        assert_eq!(stores.jobs.get("A").await.unwrap().tags, vec!["priority"]);
    }

    #[tokio::test]
    async fn distinct_ids_give_one_created_record_each() {
        let stores = Stores::new(10);
        let router = router(&stores, 0.0, 100.0, DuplicatePolicy::Reject);
        for id in ["A", "B", "C"] {
            router.route(input(id)).await.unwrap();
        }

        assert_eq!(stores.jobs.len().await, 3);
        assert_eq!(stores.jobs.count_by_status(JobStatus::Created).await, 3);
        assert_eq!(stores.submission_queue.snapshot().await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn duplicate_id_rejected_by_default_policy() {
        let stores = Stores::new(10);
        let router = router(&stores, 0.0, 100.0, DuplicatePolicy::Reject);
        router.route(input("A")).await.unwrap();

        assert_matches!(router.route(input("A")).await, Err(CoreError::Conflict(_)));
        assert_eq!(stores.submission_queue.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_id_ignored_does_not_enqueue_again() {
        let stores = Stores::new(10);
        let router = router(&stores, 0.0, 100.0, DuplicatePolicy::Ignore);
        router.route(input("A")).await.unwrap();

        let second = router.route(input("A")).await.unwrap();
        assert!(second.duplicate_ignored);
        assert!(!second.routed);
        assert_eq!(stores.submission_queue.len().await, 1);
        assert_eq!(stores.jobs.get("A").await.unwrap().tags, vec!["priority", "deepgram"]);
    }

    #[tokio::test]
    async fn duplicate_id_overwritten_resets_record() {
        let stores = Stores::new(10);
        let router = router(&stores, 99.0, 50.0, DuplicatePolicy::Overwrite);
        stores
            .jobs
            .put(Job::new(CreateJob {
                tags: vec!["old".into()],
                ..input("A")
            }))
            .await
            .unwrap();

        router.route(input("A")).await.unwrap();
        assert_eq!(stores.jobs.get("A").await.unwrap().tags, vec!["priority"]);
    }

    #[tokio::test]
    async fn blank_id_or_url_is_rejected() {
        let stores = Stores::new(10);
        let router = router(&stores, 0.0, 100.0, DuplicatePolicy::Reject);

        assert_matches!(
            router.route(CreateJob { id: " ".into(), ..input("A") }).await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            router.route(CreateJob { url: String::new(), ..input("A") }).await,
            Err(CoreError::Validation(_))
        );
        assert!(stores.jobs.is_empty().await);
    }
}
