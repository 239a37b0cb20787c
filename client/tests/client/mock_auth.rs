use client::mock::{MockApi, MockSettings};
use client::services::PageQuery;
use client::{ApiConfig, ApiContext, ApiError};
use payloads::requests::{CreateUser, LoginCredentials, UpdateUser};
use payloads::{Role, UserId};
use reqwest::StatusCode;
use serde_json::Map;

fn mock_context() -> ApiContext {
    ApiContext::with_mock(
        ApiConfig {
            use_mock: true,
            ..ApiConfig::default()
        },
        MockApi::with_settings(MockSettings::instant()),
    )
}

fn first_page() -> PageQuery {
    PageQuery {
        page: 1,
        page_size: 10,
        filters: Map::new(),
    }
}

#[tokio::test]
async fn demo_admin_credentials_log_in() -> anyhow::Result<()> {
    let ctx = mock_context();

    let payload = ctx
        .services
        .login(&LoginCredentials {
            email: "admin@example.com".into(),
            password: "123456".into(),
        })
        .await?;

    assert!(payload.token.starts_with("mock-token-"));
    assert_eq!(payload.user.role, Role::Admin);
    assert_eq!(payload.user.email, "admin@example.com");

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let ctx = mock_context();

    let result = ctx
        .services
        .login(&LoginCredentials {
            email: "admin@example.com".into(),
            password: "654321".into(),
        })
        .await;

    match result {
        Err(ApiError::Status { status, message, .. }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("expected wrong-credentials error, got {other:?}"),
    }
}

#[tokio::test]
async fn listing_defaults_to_the_seeded_dataset() -> anyhow::Result<()> {
    let ctx = mock_context();

    let page = ctx.services.list_users(&first_page()).await?;
    assert_eq!(page.data.len(), 8);
    assert_eq!(page.pagination.total, 8);
    assert_eq!(page.pagination.total_pages, 1);

    Ok(())
}

#[tokio::test]
async fn detail_includes_role_based_permissions() -> anyhow::Result<()> {
    let ctx = mock_context();

    let admin = ctx.services.get_user(UserId(1)).await?;
    assert!(admin.permissions.contains(&"delete".to_string()));
    assert!(admin.login_count >= 1);

    let plain = ctx.services.get_user(UserId(2)).await?;
    assert_eq!(plain.permissions, vec!["read".to_string()]);

    let missing = ctx.services.get_user(UserId(999)).await;
    match missing {
        Err(ApiError::Status { status, message, .. }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "User not found");
        }
        other => panic!("expected not-found error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn crud_round_trip() -> anyhow::Result<()> {
    let ctx = mock_context();

    let created = ctx
        .services
        .create_user(&CreateUser {
            name: "Iris Novak".into(),
            email: "iris.novak@example.com".into(),
            role: Role::User,
        })
        .await?;
    assert_eq!(created.id, UserId(9));

    let updated = ctx
        .services
        .update_user(
            created.id,
            &UpdateUser {
                name: Some("Iris Novak-Kim".into()),
                ..UpdateUser::default()
            },
        )
        .await?;
    assert_eq!(updated.name, "Iris Novak-Kim");
    assert!(updated.updated_at.is_some());

    ctx.services.delete_user(created.id).await?;
    let page = ctx.services.list_users(&first_page()).await?;
    assert_eq!(page.pagination.total, 8);

    Ok(())
}

#[tokio::test]
async fn system_endpoints_report_the_demo_fixture() -> anyhow::Result<()> {
    let ctx = mock_context();

    let health = ctx.services.health_check().await?;
    assert_eq!(health.status, "healthy");
    assert_eq!(health.services["database"].status, "up");

    let config = ctx.services.get_config().await?;
    assert_eq!(config.limits.max_users, 1000);
    assert!(config.features.dark_mode);

    let version = ctx.services.get_version().await?;
    assert_eq!(version.version, "1.0.0");

    Ok(())
}
