//! Shared test harness
//!
//! Each integration test file declares `mod harness;`, so not every
//! binary uses every helper.
#![allow(dead_code, clippy::unused_async)]

pub mod config;
pub mod mock_identity;
pub mod mock_model;
pub mod server;

pub use config::ConfigBuilder;
pub use mock_identity::MockIdentity;
pub use mock_model::MockModel;
pub use server::TestServer;

/// Spin up both mocks and a gateway wired to them
pub async fn default_stack() -> anyhow::Result<(MockIdentity, MockModel, TestServer)> {
    let identity = MockIdentity::start().await?;
    let model = MockModel::start().await?;
    let config = ConfigBuilder::new(&identity.base_url(), &model.base_url()).build()?;
    let server = TestServer::start(&config).await?;
    Ok((identity, model, server))
}
