//! Query construction for `POST /v1/listen`.

/// Speech model requested for every submission.
pub const MODEL: &str = "nova-3";

/// Path the webhook receiver is mounted at, relative to the callback base URL.
pub const CALLBACK_PATH: &str = "/api/dg-webhook";

/// One asynchronous transcription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenRequest {
    pub audio_url: String,
    pub callback_url: String,
    pub keyterms: Vec<String>,
}

impl ListenRequest {
    pub fn new(audio_url: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            callback_url: callback_url.into(),
            keyterms: Vec::new(),
        }
    }

    pub fn with_keyterms(mut self, keyterms: Vec<String>) -> Self {
        self.keyterms = keyterms;
        self
    }

    /// Query string with fixed model/formatting options, diarization and the
    /// callback. The `keyterm` parameter is appended only when keyterms are
    /// present: each term is percent-encoded and terms are joined by `+`.
    ///
    /// Encoding leaves only `A-Z a-z 0-9 - . _ ~` unescaped, so `!'()*` are
    /// escaped too (`it's` becomes `it%27s`). The provider decodes both forms.
    pub fn query_string(&self) -> String {
        let mut query = format!(
            "model={MODEL}&smart_format=true&diarize=true&callback={}",
            urlencoding::encode(&self.callback_url)
        );

        if !self.keyterms.is_empty() {
            let terms: Vec<_> = self
                .keyterms
                .iter()
                .map(|term| urlencoding::encode(term))
                .collect();
            query.push_str("&keyterm=");
            query.push_str(&terms.join("+"));
        }

        query
    }

    /// JSON body carrying the audio location.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "url": self.audio_url })
    }
}

/// Build the callback URL from the public base URL of this service.
pub fn callback_url(base: &str) -> String {
    format!("{}{CALLBACK_PATH}", base.trim_end_matches('/'))
}
