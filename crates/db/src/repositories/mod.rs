//! Storage layer.
//!
//! Each store owns its data behind a single `tokio::sync` lock so every
//! read-modify-write sequence is atomic to concurrent callers.

pub mod dead_letter_sink;
pub mod job_queue;
pub mod job_store;

pub use dead_letter_sink::DeadLetterSink;
pub use job_queue::JobQueue;
pub use job_store::{Correlation, InsertOutcome, JobStore};
