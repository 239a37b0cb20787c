mod auth;
mod batch;
mod mock_auth;
mod retry;
mod transport;
mod upload;

use test_helpers::spawn_app;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let health: payloads::responses::SystemHealth = app
        .ctx
        .transport
        .get_json("/system/health", Vec::new())
        .await?;
    assert_eq!(health.status, "healthy");
    assert_eq!(health.services["database"].status, "up");

    Ok(())
}
