//! In-process storage for support calls.
//!
//! The store and both queues live for the lifetime of the service process
//! and are shared by handle; nothing is persisted across restarts.

pub mod models;
pub mod repositories;

use std::sync::Arc;

use repositories::{DeadLetterSink, JobQueue, JobStore};

/// Handles to every shared data structure of the pipeline.
///
/// Cheap to clone. Build one per process (or per test) with [`Stores::new`].
#[derive(Clone)]
pub struct Stores {
    pub jobs: Arc<JobStore>,
    pub submission_queue: Arc<JobQueue>,
    pub processing_queue: Arc<JobQueue>,
    pub dead_letters: Arc<DeadLetterSink>,
}

impl Stores {
    /// Create empty stores with the given dead-letter capacity.
    pub fn new(dead_letter_capacity: usize) -> Self {
        Self {
            jobs: Arc::new(JobStore::new()),
            submission_queue: Arc::new(JobQueue::submission()),
            processing_queue: Arc::new(JobQueue::processing()),
            dead_letters: Arc::new(DeadLetterSink::new(dead_letter_capacity)),
        }
    }
}
