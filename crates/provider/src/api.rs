//! REST client for the Deepgram pre-recorded `listen` endpoint.
//!
//! Only the asynchronous (callback) mode is used: the synchronous response
//! carries the request id, never the transcript.

use std::time::Duration;

use serde::Deserialize;

use crate::request::ListenRequest;

/// Acknowledgment returned by `/v1/listen` when a callback is requested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitAck {
    /// Provider-assigned request identifier (the callback correlation key).
    pub request_id: String,
}

/// Errors from the provider REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx acknowledgment without a usable request id.
    #[error("Provider acknowledgment carried no request_id")]
    MissingRequestId,
}

impl ProviderError {
    /// Whether the provider signalled its own concurrency limit.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::ApiError { status: 429, .. })
    }
}

/// HTTP client for the provider.
pub struct DeepgramApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl DeepgramApi {
    /// Create a client with its own connection pool.
    ///
    /// * `api_url` - Base URL, e.g. `https://api.deepgram.com`.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url, api_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Full URL of the listen endpoint for `request`.
    pub fn listen_url(&self, request: &ListenRequest) -> String {
        format!("{}/v1/listen?{}", self.api_url, request.query_string())
    }

    /// Submit a remote audio file for asynchronous transcription.
    pub async fn submit_listen(&self, request: &ListenRequest) -> Result<SubmitAck, ProviderError> {
        let response = self
            .client
            .post(self.listen_url(request))
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&request.body())
            .send()
            .await?;

        let ack: SubmitAck = Self::ensure_success(response).await?.json().await?;
        if ack.request_id.trim().is_empty() {
            return Err(ProviderError::MissingRequestId);
        }

        tracing::debug!(request_id = %ack.request_id, "Provider accepted submission");
        Ok(ack)
    }

    /// Return the response unchanged on success, or an
    /// [`ProviderError::ApiError`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
