use client::ApiError;
use client::config::messages;
use client::events::AuthEvent;
use client::storage::keys;
use payloads::Role;
use payloads::requests::LoginCredentials;
use reqwest::StatusCode;
use serde_json::Value;
use test_helpers::{assert_status, spawn_app};

#[tokio::test]
async fn unauthorized_clears_credentials_and_signals_logout() {
    let app = spawn_app().await;
    let ctx = &app.ctx;

    ctx.storage.set(keys::AUTH_TOKEN, &"stale-token");
    ctx.storage
        .set(keys::USER_PROFILE, &serde_json::json!({"id": 1}));
    let mut logout_rx = ctx.auth_events.subscribe();

    let result: Result<Value, ApiError> =
        ctx.transport.get_json("/always/401", Vec::new()).await;
    assert_status(result, StatusCode::UNAUTHORIZED);

    // both persisted keys wiped, exactly one logout broadcast
    assert!(!ctx.storage.contains(keys::AUTH_TOKEN));
    assert!(!ctx.storage.contains(keys::USER_PROFILE));
    assert_eq!(logout_rx.try_recv().unwrap(), AuthEvent::LoggedOut);
    assert!(logout_rx.try_recv().is_err());
}

#[tokio::test]
async fn unauthorized_maps_to_the_session_expired_message() {
    let app = spawn_app().await;

    let result: Result<Value, ApiError> =
        app.ctx.transport.get_json("/always/401", Vec::new()).await;
    match result {
        Err(err @ ApiError::Status { .. }) => {
            // the fixed table wins over the server's own message here
            assert_eq!(err.to_string(), messages::UNAUTHORIZED);
            assert_eq!(err.server_message(), Some("scripted failure"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn login_round_trip() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let payload = app
        .ctx
        .services
        .login(&LoginCredentials {
            email: "admin@example.com".into(),
            password: "123456".into(),
        })
        .await?;
    assert_eq!(payload.token, "server-token-1");
    assert_eq!(payload.user.role, Role::Admin);

    let wrong = app
        .ctx
        .services
        .login(&LoginCredentials {
            email: "admin@example.com".into(),
            password: "wrong".into(),
        })
        .await;
    assert_status(wrong, StatusCode::UNAUTHORIZED);

    Ok(())
}
