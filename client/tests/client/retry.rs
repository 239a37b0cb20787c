use client::ApiError;
use client::transport::RequestDescriptor;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use test_helpers::{assert_status, spawn_app};

#[tokio::test]
async fn transient_server_errors_are_retried() -> anyhow::Result<()> {
    let app = spawn_app().await;

    // two 500s, then success: the call settles Ok within the default
    // budget of three retries
    let value: Value =
        app.ctx.transport.get_json("/flaky/2", Vec::new()).await?;
    assert_eq!(value["attempts"], 3);

    Ok(())
}

#[tokio::test]
async fn retry_budget_is_bounded() {
    let app = spawn_app().await;

    let result: Result<Value, ApiError> =
        app.ctx.transport.get_json("/always/500", Vec::new()).await;
    assert_status(result, StatusCode::INTERNAL_SERVER_ERROR);

    // initial attempt plus exactly three retries
    assert_eq!(app.hits().await, 4);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let app = spawn_app().await;

    let result: Result<Value, ApiError> =
        app.ctx.transport.get_json("/always/400", Vec::new()).await;
    match result {
        Err(ApiError::Status { status, message, .. }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            // 400 prefers the server-provided message
            assert_eq!(message, "scripted failure");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(app.hits().await, 1);
}

#[tokio::test]
async fn zero_retry_budget_fails_fast() {
    let app = spawn_app().await;
    let ctx = app.context(|config| config.retry_count = 0);

    let result: Result<Value, ApiError> =
        ctx.transport.get_json("/flaky/1", Vec::new()).await;
    assert_status(result, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.hits().await, 1);
}

#[tokio::test]
async fn deadline_overruns_classify_as_timeouts() {
    let app = spawn_app().await;
    let ctx = app.context(|config| config.retry_count = 0);

    let result = ctx
        .transport
        .send(
            RequestDescriptor::get("/slow/400")
                .with_timeout(Duration::from_millis(50)),
        )
        .await;
    assert!(matches!(result, Err(ApiError::Timeout)));
}
