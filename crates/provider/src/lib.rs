//! Client side of the asynchronous speech-to-text provider.
//!
//! Submission is fire-and-acknowledge: the provider answers with a request id
//! and later delivers the transcript to the callback URL.

pub mod api;
pub mod request;

use async_trait::async_trait;

pub use api::{DeepgramApi, ProviderError, SubmitAck};
pub use request::ListenRequest;

/// Seam between the submission worker and the provider.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Submit an audio URL for asynchronous transcription.
    async fn submit(&self, request: &ListenRequest) -> Result<SubmitAck, ProviderError>;
}

#[async_trait]
impl TranscriptionProvider for DeepgramApi {
    async fn submit(&self, request: &ListenRequest) -> Result<SubmitAck, ProviderError> {
        self.submit_listen(request).await
    }
}
