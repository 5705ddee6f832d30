mod harness;

use harness::{ConfigBuilder, MockIdentity, MockModel, TestServer};
use serde_json::{Value, json};

#[tokio::test]
async fn health_endpoint_requires_no_auth() -> anyhow::Result<()> {
    let (_identity, _model, server) = harness::default_stack().await?;

    let response = reqwest::get(server.url("/health")).await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body, json!({ "ok": true }));

    Ok(())
}

#[tokio::test]
async fn disabled_health_endpoint_is_absent() -> anyhow::Result<()> {
    let identity = MockIdentity::start().await?;
    let model = MockModel::start().await?;
    let config = ConfigBuilder::new(&identity.base_url(), &model.base_url())
        .health_enabled(false)
        .build()?;
    let server = TestServer::start(&config).await?;

    let response = reqwest::get(server.url("/health")).await?;
    assert_eq!(response.status(), 404);

    Ok(())
}

#[tokio::test]
async fn root_descriptor_lists_endpoints() -> anyhow::Result<()> {
    let (_identity, _model, server) = harness::default_stack().await?;

    let response = reqwest::get(server.url("/")).await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["name"], "Parlo API");
    assert_eq!(body["endpoints"]["transcribe"], "/v1/transcribe");
    assert_eq!(body["endpoints"]["improve"], "/v1/improve");
    assert_eq!(body["endpoints"]["analyzeImage"], "/v1/analyze-image");

    Ok(())
}
