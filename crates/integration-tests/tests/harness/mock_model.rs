//! Mock model backend for integration tests
//!
//! Implements the minimal OpenAI-compatible surface the gateway calls:
//! chat completions (rewrite + image description) and audio
//! transcriptions, returning canned responses.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Mock model backend that returns predictable responses
pub struct MockModel {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockModelState>,
}

struct MockModelState {
    chat_count: AtomicU32,
    transcription_count: AtomicU32,
    /// Number of requests to fail with 500 before succeeding (0 = never)
    fail_count: AtomicU32,
    /// Custom rewrite content (if set); defaults to a valid result
    rewrite_content: Option<String>,
}

/// A schema-conformant rewrite output used as the default canned response
pub fn valid_improve_output() -> Value {
    json!({
        "improved": "I went to the store yesterday.",
        "alternatives": {
            "formal": "Yesterday, I visited the store.",
            "casual": "I hit the store yesterday.",
            "concise": "I went to the store."
        },
        "feedback": {
            "summary": ["Clear core message.", "Work on past tense consistency."],
            "grammar_fixes": [
                { "from": "i go", "to": "I went", "why": "past tense for yesterday" }
            ],
            "vocabulary_upgrades": [],
            "filler_words": { "count": 0, "examples": [] }
        }
    })
}

impl MockModel {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, None).await
    }

    /// Start a mock server that fails the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, None).await
    }

    /// Start a mock server returning custom rewrite content
    pub async fn start_with_rewrite(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, Some(content.to_owned())).await
    }

    async fn start_inner(fail_count: u32, rewrite_content: Option<String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockModelState {
            chat_count: AtomicU32::new(0),
            transcription_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            rewrite_content,
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/audio/transcriptions", routing::post(handle_transcriptions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the model provider
    ///
    /// Includes `/v1` since the provider appends paths like `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of chat completion requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    /// Number of transcription requests received
    pub fn transcription_count(&self) -> u32 {
        self.state.transcription_count.load(Ordering::Relaxed)
    }

    /// Total model calls received
    pub fn total_count(&self) -> u32 {
        self.chat_count() + self.transcription_count()
    }
}

impl Drop for MockModel {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn should_fail(state: &MockModelState) -> bool {
    state
        .fail_count
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

async fn handle_chat_completions(
    State(state): State<Arc<MockModelState>>,
    Json(request): Json<Value>,
) -> impl IntoResponse {
    state.chat_count.fetch_add(1, Ordering::Relaxed);

    if should_fail(&state) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "mock provider failure" } })),
        );
    }

    // Structured-output requests are rewrites; plain requests are
    // image descriptions
    let content = if request.get("response_format").is_some() {
        state
            .rewrite_content
            .clone()
            .unwrap_or_else(|| valid_improve_output().to_string())
    } else {
        "a red bicycle leaning against a brick wall".to_owned()
    };

    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": request["model"],
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }
            ]
        })),
    )
}

async fn handle_transcriptions(State(state): State<Arc<MockModelState>>) -> impl IntoResponse {
    state.transcription_count.fetch_add(1, Ordering::Relaxed);

    if should_fail(&state) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "mock provider failure" } })),
        );
    }

    (StatusCode::OK, Json(json!({ "text": "i go to store yesterday" })))
}
