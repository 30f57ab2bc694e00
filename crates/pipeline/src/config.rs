use callroute_core::types::DuplicatePolicy;

/// Default cap on the raw callback body.
pub const DEFAULT_WEBHOOK_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default number of retained dead letters.
pub const DEFAULT_DEAD_LETTER_CAPACITY: usize = 1000;

/// Settings consumed by the pipeline components.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum provider requests in `Transcribing` at once.
    pub max_concurrent: usize,
    /// Share of new support calls routed to the provider, `0..=100`.
    pub routing_percent: f64,
    /// Absolute URL the provider calls back (the webhook route).
    pub callback_url: String,
    /// Expected value of the callback shared-secret header.
    pub webhook_secret: String,
    /// Behaviour when a support call id is reused.
    pub duplicate_policy: DuplicatePolicy,
    /// Maximum accepted callback body size.
    pub webhook_max_body_bytes: usize,
    /// Number of dead letters retained for inspection.
    pub dead_letter_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            routing_percent: 100.0,
            callback_url: "http://localhost:3000/api/dg-webhook".into(),
            webhook_secret: String::new(),
            duplicate_policy: DuplicatePolicy::default(),
            webhook_max_body_bytes: DEFAULT_WEBHOOK_MAX_BODY_BYTES,
            dead_letter_capacity: DEFAULT_DEAD_LETTER_CAPACITY,
        }
    }
}
