//! Cap on concurrently outstanding provider requests.
//!
//! `can_admit` is the plain point-in-time check on the number of support
//! calls in `Transcribing`. `try_reserve` additionally counts reservations
//! held by submissions that have not reached `Transcribing` yet, so two
//! overlapping submissions cannot both take the last slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callroute_core::status::JobStatus;
use callroute_db::repositories::JobStore;
use tokio::sync::Mutex;

pub struct AdmissionController {
    jobs: Arc<JobStore>,
    max_concurrent: usize,
    /// Serializes reservation decisions.
    gate: Mutex<()>,
    reserved: Arc<AtomicUsize>,
}

/// A reserved provider slot. Released on drop.
///
/// Drop it only after the support call has moved to `Transcribing` (or the
/// submission failed), so the slot is never counted as free in between.
#[derive(Debug)]
pub struct AdmissionPermit {
    reserved: Arc<AtomicUsize>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.reserved.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AdmissionController {
    pub fn new(jobs: Arc<JobStore>, max_concurrent: usize) -> Self {
        Self {
            jobs,
            max_concurrent,
            gate: Mutex::new(()),
            reserved: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Number of support calls currently in `Transcribing`.
    pub async fn in_flight(&self) -> usize {
        self.jobs.count_by_status(JobStatus::Transcribing).await
    }

    /// Reservations not yet converted into `Transcribing` records.
    pub fn reserved(&self) -> usize {
        self.reserved.load(Ordering::SeqCst)
    }

    /// True iff fewer than `max_concurrent` support calls are `Transcribing`.
    pub async fn can_admit(&self) -> bool {
        self.in_flight().await < self.max_concurrent
    }

    /// Reserve a slot if `in_flight + reserved < max_concurrent`.
    pub async fn try_reserve(&self) -> Option<AdmissionPermit> {
        let _gate = self.gate.lock().await;

        let in_flight = self.in_flight().await;
        let reserved = self.reserved.load(Ordering::SeqCst);
        if in_flight + reserved >= self.max_concurrent {
            tracing::debug!(
                in_flight,
                reserved,
                max_concurrent = self.max_concurrent,
                "Admission denied",
            );
            return None;
        }

        self.reserved.fetch_add(1, Ordering::SeqCst);
        Some(AdmissionPermit {
            reserved: Arc::clone(&self.reserved),
        })
    }
}

#[cfg(test)]
mod tests {
    use callroute_db::models::job::{CreateJob, Job};

    use super::*;

    async fn store_with_transcribing(count: usize) -> Arc<JobStore> {
        let store = Arc::new(JobStore::new());
        for i in 0..count {
            let id = format!("call-{i}");
            store
                .put(Job::new(CreateJob {
                    id: id.clone(),
                    url: "https://audio/x.wav".into(),
                    keyterms: vec![],
                    tags: vec![],
                }))
                .await
                .unwrap();
            store.mark_transcribing(&id, &format!("R{i}")).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn admits_below_limit() {
        let controller = AdmissionController::new(store_with_transcribing(1).await, 2);
        assert!(controller.can_admit().await);
        assert!(controller.try_reserve().await.is_some());
    }

    #[tokio::test]
    async fn denies_at_limit() {
        let controller = AdmissionController::new(store_with_transcribing(2).await, 2);
        assert!(!controller.can_admit().await);
        assert!(controller.try_reserve().await.is_none());
    }

    #[tokio::test]
    async fn zero_limit_never_admits() {
        let controller = AdmissionController::new(Arc::new(JobStore::new()), 0);
        assert!(!controller.can_admit().await);
        assert!(controller.try_reserve().await.is_none());
    }

    #[tokio::test]
    async fn reservations_count_against_the_limit() {
        let controller = AdmissionController::new(Arc::new(JobStore::new()), 2);

        let first = controller.try_reserve().await.expect("first slot");
        let _second = controller.try_reserve().await.expect("second slot");
        assert!(controller.try_reserve().await.is_none());
        assert_eq!(controller.reserved(), 2);

        // The point-in-time check only looks at Transcribing records.
        assert!(controller.can_admit().await);

        drop(first);
        assert_eq!(controller.reserved(), 1);
        assert!(controller.try_reserve().await.is_some());
    }

    #[tokio::test]
    async fn concurrent_reservations_never_exceed_limit() {
        let controller = Arc::new(AdmissionController::new(Arc::new(JobStore::new()), 3));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let controller = Arc::clone(&controller);
            handles.push(tokio::spawn(async move { controller.try_reserve().await }));
        }

        let mut permits = Vec::new();
        for handle in handles {
            if let Some(permit) = handle.await.unwrap() {
                permits.push(permit);
            }
        }
        assert_eq!(permits.len(), 3);

        permits.clear();
        assert_eq!(controller.reserved(), 0);
    }
}
