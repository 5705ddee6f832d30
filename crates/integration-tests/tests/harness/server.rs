//! Gateway-under-test wrapper

use std::net::SocketAddr;

use parlo_config::Config;
use tokio_util::sync::CancellationToken;

/// A running gateway bound to an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Build the gateway from `config` and serve it on 127.0.0.1:0
    pub async fn start(config: &Config) -> anyhow::Result<Self> {
        let router = parlo_server::Server::new(config)?.into_router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown })
    }

    /// Full URL for a path on the running gateway
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
