use client::ApiError;
use client::storage::keys;
use client::transport::RequestDescriptor;
use serde_json::Value;
use test_helpers::spawn_app;

#[tokio::test]
async fn bearer_token_attached_when_present() -> anyhow::Result<()> {
    let app = spawn_app().await;

    // no token stored yet
    let echoed: Value =
        app.ctx.transport.get_json("/echo/auth", Vec::new()).await?;
    assert_eq!(echoed["authorization"], Value::Null);

    app.ctx.storage.set(keys::AUTH_TOKEN, &"token-123");
    let echoed: Value =
        app.ctx.transport.get_json("/echo/auth", Vec::new()).await?;
    assert_eq!(echoed["authorization"], "Bearer token-123");

    Ok(())
}

#[tokio::test]
async fn newer_identical_request_supersedes_older() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let transport = &app.ctx.transport;

    let first = transport.send(RequestDescriptor::get("/slow/300"));
    let second = transport.send(RequestDescriptor::get("/slow/300"));
    let (first, second) = tokio::join!(first, second);

    // only the most recently issued request's result is honored
    assert!(matches!(first, Err(ApiError::Superseded)));
    assert_eq!(second?["message"], "finally");

    Ok(())
}

#[tokio::test]
async fn requests_with_distinct_params_run_independently()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    let transport = &app.ctx.transport;

    let first = transport.send(
        RequestDescriptor::get("/slow/100")
            .with_params(vec![("tag".into(), "a".into())]),
    );
    let second = transport.send(
        RequestDescriptor::get("/slow/100")
            .with_params(vec![("tag".into(), "b".into())]),
    );
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(second.is_ok());

    Ok(())
}

#[tokio::test]
async fn non_json_bodies_surface_as_raw_text() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let value = app
        .ctx
        .transport
        .send(RequestDescriptor::get("/text"))
        .await?;
    assert_eq!(value, Value::String("pong".into()));

    Ok(())
}

#[tokio::test]
async fn connection_failures_classify_as_network_errors() {
    // nothing listens on this port
    let app = spawn_app().await;
    let ctx = app.context(|config| {
        config.base_url = "http://127.0.0.1:9/api".into();
        config.retry_count = 0;
    });

    let result = ctx.transport.send(RequestDescriptor::get("/anything")).await;
    assert!(matches!(result, Err(ApiError::Network { .. })));
}
