#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::unused_async)]

mod auth;
mod cors;
mod descriptor;
mod health;

use std::net::SocketAddr;

use axum::Router;
use parlo_config::Config;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the speech pipeline or identity verifier
    /// fails to initialize. Verifier construction failure is a hard
    /// startup error, never a silent fallback to unauthenticated mode.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        let speech_state = parlo_speech::build_server(config)?;

        let verifier = parlo_auth::IdentityVerifier::new(&config.identity)
            .map_err(|e| anyhow::anyhow!("failed to initialize identity verifier: {e}"))?;

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Service descriptor
        app = app.route("/", axum::routing::get(descriptor::root_handler));

        // Speech routes
        app = app.merge(parlo_speech::endpoint_router().with_state(speech_state));

        // Apply middleware layers (innermost first)

        // Bearer token verification for /v1/* (runs before body parsing)
        app = app.layer(axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                let verifier = verifier.clone();
                async move { auth::auth_middleware(verifier, req, next).await }
            },
        ));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS (outermost so preflight requests never hit auth)
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
