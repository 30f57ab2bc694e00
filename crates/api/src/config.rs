use std::time::Duration;

use callroute_core::routing::validate_percent;
use callroute_core::types::DuplicatePolicy;
use callroute_pipeline::config::{DEFAULT_DEAD_LETTER_CAPACITY, DEFAULT_WEBHOOK_MAX_BODY_BYTES};
use callroute_pipeline::PipelineConfig;
use callroute_provider::request::callback_url;

/// Connection settings for the transcription provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider REST API.
    pub api_url: String,
    /// API key sent as `Authorization: Token <key>`.
    pub api_key: String,
    /// Timeout for a single submission request.
    pub timeout: Duration,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Malformed values
/// panic at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub provider: ProviderConfig,
    pub pipeline: PipelineConfig,
    /// Tick interval of the in-process worker pump; `None` disables it.
    pub worker_poll_interval: Option<Duration>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                    |
    /// |--------------------------------|----------------------------|
    /// | `HOST`                         | `0.0.0.0`                  |
    /// | `PORT`                         | `3000`                     |
    /// | `CORS_ORIGINS`                 | (none)                     |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                       |
    /// | `DEEPGRAM_API_URL`             | `https://api.deepgram.com` |
    /// | `DEEPGRAM_API_KEY`             | (empty, warns)             |
    /// | `PROVIDER_TIMEOUT_SECS`        | `30`                       |
    /// | `DEEPGRAM_MAX_CONCURRENT_REQS` | `10`                       |
    /// | `ROUTE_TO_DEEPGRAM_PERCENT`    | `100`                      |
    /// | `TUNNEL_URL`                   | `http://localhost:3000`    |
    /// | `DEEPGRAM_API_KEY_IDENTIFIER`  | (empty, warns)             |
    /// | `DUPLICATE_ID_POLICY`          | `reject`                   |
    /// | `WEBHOOK_MAX_BODY_BYTES`       | `10485760`                 |
    /// | `DEAD_LETTER_CAPACITY`         | `1000`                     |
    /// | `WORKER_POLL_INTERVAL_MS`      | (unset, pump disabled)     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        // --- Provider ---
        let api_url = std::env::var("DEEPGRAM_API_URL")
            .unwrap_or_else(|_| "https://api.deepgram.com".into());

        let api_key = std::env::var("DEEPGRAM_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("DEEPGRAM_API_KEY is not set; provider submissions will be rejected");
        }

        let provider_timeout_secs: u64 = std::env::var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PROVIDER_TIMEOUT_SECS must be a valid u64");

        // --- Pipeline ---
        let max_concurrent: usize = std::env::var("DEEPGRAM_MAX_CONCURRENT_REQS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DEEPGRAM_MAX_CONCURRENT_REQS must be a valid usize");

        let routing_percent: f64 = std::env::var("ROUTE_TO_DEEPGRAM_PERCENT")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("ROUTE_TO_DEEPGRAM_PERCENT must be a number");
        let routing_percent = validate_percent(routing_percent)
            .unwrap_or_else(|e| panic!("ROUTE_TO_DEEPGRAM_PERCENT: {e}"));

        let tunnel_url =
            std::env::var("TUNNEL_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let webhook_secret = std::env::var("DEEPGRAM_API_KEY_IDENTIFIER").unwrap_or_default();
        if webhook_secret.is_empty() {
            tracing::warn!("DEEPGRAM_API_KEY_IDENTIFIER is not set; every webhook will be rejected");
        }

        let duplicate_policy: DuplicatePolicy = std::env::var("DUPLICATE_ID_POLICY")
            .unwrap_or_else(|_| "reject".into())
            .parse()
            .unwrap_or_else(|e| panic!("DUPLICATE_ID_POLICY: {e}"));

        let webhook_max_body_bytes: usize = std::env::var("WEBHOOK_MAX_BODY_BYTES")
            .map(|v| v.parse().expect("WEBHOOK_MAX_BODY_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_WEBHOOK_MAX_BODY_BYTES);

        let dead_letter_capacity: usize = std::env::var("DEAD_LETTER_CAPACITY")
            .map(|v| v.parse().expect("DEAD_LETTER_CAPACITY must be a valid usize"))
            .unwrap_or(DEFAULT_DEAD_LETTER_CAPACITY);

        let worker_poll_interval = std::env::var("WORKER_POLL_INTERVAL_MS")
            .ok()
            .map(|v| {
                v.parse::<u64>()
                    .expect("WORKER_POLL_INTERVAL_MS must be a valid u64")
            })
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            provider: ProviderConfig {
                api_url,
                api_key,
                timeout: Duration::from_secs(provider_timeout_secs),
            },
            pipeline: PipelineConfig {
                max_concurrent,
                routing_percent,
                callback_url: callback_url(&tunnel_url),
                webhook_secret,
                duplicate_policy,
                webhook_max_body_bytes,
                dead_letter_capacity,
            },
            worker_poll_interval,
        }
    }
}
