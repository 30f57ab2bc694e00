#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use callroute_api::config::{ProviderConfig, ServerConfig};
use callroute_api::routes;
use callroute_api::state::AppState;
use callroute_core::routing::FixedDraw;
use callroute_pipeline::{Pipeline, PipelineConfig};
use callroute_provider::{ListenRequest, ProviderError, SubmitAck, TranscriptionProvider};
use http_body_util::BodyExt;
use tokio::sync::Mutex;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const SECRET: &str = "test-callback-secret";

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// In-process provider returning scripted replies, then `R<n>` acks.
#[derive(Default)]
pub struct FakeProvider {
    failures: Mutex<VecDeque<u16>>,
    pub requests: Mutex<Vec<ListenRequest>>,
}

impl FakeProvider {
    /// Fail the next submissions with the given HTTP statuses.
    pub fn failing(statuses: &[u16]) -> Self {
        Self {
            failures: Mutex::new(statuses.iter().copied().collect()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl TranscriptionProvider for FakeProvider {
    async fn submit(&self, request: &ListenRequest) -> Result<SubmitAck, ProviderError> {
        let n = {
            let mut requests = self.requests.lock().await;
            requests.push(request.clone());
            requests.len()
        };
        if let Some(status) = self.failures.lock().await.pop_front() {
            return Err(ProviderError::ApiError {
                status,
                body: "scripted failure".into(),
            });
        }
        Ok(SubmitAck {
            request_id: format!("R{n}"),
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(max_concurrent: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        provider: ProviderConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
        },
        pipeline: PipelineConfig {
            max_concurrent,
            routing_percent: 100.0,
            callback_url: "https://tunnel.test/api/dg-webhook".to_string(),
            webhook_secret: SECRET.to_string(),
            webhook_max_body_bytes: 4096,
            ..Default::default()
        },
        worker_poll_interval: None,
    }
}

/// A running test application plus handles for direct inspection.
pub struct TestApp {
    pub router: Router,
    pub pipeline: Arc<Pipeline>,
    pub provider: Arc<FakeProvider>,
}

/// Build the application router with the production middleware stack around
/// a fresh pipeline that routes every call and talks to `provider`.
pub fn build_test_app_with(config: ServerConfig, provider: FakeProvider) -> TestApp {
    let provider = Arc::new(provider);
    let pipeline = Arc::new(
        Pipeline::builder(config.pipeline.clone(), provider.clone())
            .draw(Arc::new(FixedDraw(0.0)))
            .build(),
    );

    let state = AppState {
        pipeline: Arc::clone(&pipeline),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state);

    TestApp {
        router,
        pipeline,
        provider,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config(10), FakeProvider::default())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw webhook body with an optional `dg-token` header.
pub async fn post_webhook(app: Router, token: Option<&str>, body: impl Into<Body>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/dg-webhook")
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("dg-token", token);
    }
    app.oneshot(builder.body(body.into()).unwrap()).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Provider callback body for `request_id`.
pub fn callback_body(request_id: &str) -> String {
    serde_json::json!({
        "metadata": { "request_id": request_id },
        "results": { "channels": [] }
    })
    .to_string()
}

pub fn new_call(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "url": format!("https://audio.test/{id}.wav"),
        "keyterms": ["refund"],
        "tags": ["priority"]
    })
}
