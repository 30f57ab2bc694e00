use crate::status::JobStatus;
use crate::types::QueueKind;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Maximum concurrent provider requests reached")]
    AdmissionDenied,

    #[error("No support call in {queue} queue")]
    QueueEmpty { queue: QueueKind },

    #[error("Support call not found: {id}")]
    JobNotFound { id: String },

    #[error("Provider submission failed: {0}")]
    ProviderSubmissionFailed(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Support call {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
