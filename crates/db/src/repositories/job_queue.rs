//! FIFO of support call ids.
//!
//! The queue does not deduplicate; producers are responsible for enqueueing
//! an id at most once per status.

use std::collections::VecDeque;

use callroute_core::types::{JobId, QueueKind};
use tokio::sync::Mutex;

pub struct JobQueue {
    kind: QueueKind,
    items: Mutex<VecDeque<JobId>>,
}

impl JobQueue {
    pub fn new(kind: QueueKind) -> Self {
        Self {
            kind,
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn submission() -> Self {
        Self::new(QueueKind::Submission)
    }

    pub fn processing() -> Self {
        Self::new(QueueKind::Processing)
    }

    pub fn kind(&self) -> QueueKind {
        self.kind
    }

    /// Append an id at the tail. Returns the queue length after the push.
    pub async fn push(&self, id: impl Into<JobId>) -> usize {
        let mut items = self.items.lock().await;
        items.push_back(id.into());
        items.len()
    }

    /// Remove and return the head, or `None` when empty.
    pub async fn pop(&self) -> Option<JobId> {
        self.items.lock().await.pop_front()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Copy of the queue contents, head first.
    pub async fn snapshot(&self) -> Vec<JobId> {
        self.items.lock().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn pops_in_fifo_order() {
        let queue = JobQueue::submission();
        assert_eq!(queue.push("A").await, 1);
        assert_eq!(queue.push("B").await, 2);
        assert_eq!(queue.push("C").await, 3);

        assert_eq!(queue.pop().await.as_deref(), Some("A"));
        assert_eq!(queue.pop().await.as_deref(), Some("B"));
        assert_eq!(queue.snapshot().await, vec!["C".to_string()]);
    }

    #[tokio::test]
    async fn pop_on_empty_returns_none() {
        let queue = JobQueue::processing();
        assert!(queue.pop().await.is_none());
        assert!(queue.is_empty().await);
        assert_eq!(queue.kind(), QueueKind::Processing);
    }

    #[tokio::test]
    async fn duplicates_are_not_collapsed() {
        let queue = JobQueue::submission();
        queue.push("A").await;
        queue.push("A").await;
        assert_eq!(queue.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_pops_hand_out_each_id_once() {
        let queue = Arc::new(JobQueue::submission());
        for i in 0..100 {
            queue.push(format!("call-{i}")).await;
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let queue = Arc::clone(&queue);
            handles.push(tokio::spawn(async move {
                let mut popped = Vec::new();
                while let Some(id) = queue.pop().await {
                    popped.push(id);
                }
                popped
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(seen.insert(id), "id popped twice");
            }
        }
        assert_eq!(seen.len(), 100);
    }
}
