//! Bounded record of support calls dropped by the workers.

use std::collections::VecDeque;

use tokio::sync::RwLock;

use crate::models::dead_letter::DeadLetter;

/// Keeps the most recent `capacity` dead letters; older ones are evicted.
pub struct DeadLetterSink {
    capacity: usize,
    entries: RwLock<VecDeque<DeadLetter>>,
}

impl DeadLetterSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn record(&self, letter: DeadLetter) {
        tracing::warn!(
            job_id = %letter.job_id,
            source = %letter.source,
            reason = ?letter.reason,
            detail = letter.detail.as_deref().unwrap_or(""),
            "Support call dead-lettered",
        );

        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(letter);
    }

    /// All retained entries, oldest first.
    pub async fn list(&self) -> Vec<DeadLetter> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
