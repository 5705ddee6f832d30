//! Mock identity service for integration tests
//!
//! Accepts `POST /accounts:lookup` the way the real verification API
//! does: a known-good token resolves to a fixed user, anything else is
//! rejected with 400.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// The one token the mock accepts
pub const GOOD_TOKEN: &str = "good-token";

/// The uid the mock resolves `GOOD_TOKEN` to
pub const USER_ID: &str = "user-1";

pub struct MockIdentity {
    addr: SocketAddr,
    shutdown: CancellationToken,
    lookup_count: Arc<AtomicU32>,
}

impl MockIdentity {
    pub async fn start() -> anyhow::Result<Self> {
        let lookup_count = Arc::new(AtomicU32::new(0));

        let app = Router::new()
            .route("/accounts:lookup", routing::post(handle_lookup))
            .with_state(Arc::clone(&lookup_count));

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

        Ok(Self {
            addr,
            shutdown,
            lookup_count,
        })
    }

    /// Base URL for configuring the mock as the identity service
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of lookup requests received
    pub fn lookup_count(&self) -> u32 {
        self.lookup_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockIdentity {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_lookup(
    State(count): State<Arc<AtomicU32>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    count.fetch_add(1, Ordering::Relaxed);

    if body["idToken"] == GOOD_TOKEN {
        (
            StatusCode::OK,
            Json(json!({
                "kind": "identitytoolkit#GetAccountInfoResponse",
                "users": [
                    { "localId": USER_ID, "email": "learner@example.com" }
                ]
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": { "code": 400, "message": "INVALID_ID_TOKEN" }
            })),
        )
    }
}
