//! The submission / admission / completion pipeline.
//!
//! ```text
//! CallRouter -> submission queue -> SubmissionWorker -> provider (async)
//!     -> WebhookReceiver -> processing queue -> ProcessingWorker
//! ```
//!
//! Every component is a single bounded unit of work per invocation; callers
//! (HTTP handlers, an external scheduler, or [`pump::WorkerPump`]) decide
//! the cadence.

pub mod admission;
pub mod config;
pub mod pipeline;
pub mod processing;
pub mod pump;
pub mod router;
pub mod submission;
pub mod webhook;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineSnapshot};
