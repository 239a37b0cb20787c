use actix_web::dev::Server;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use client::{ApiConfig, ApiContext, ApiError};
use serde_json::json;
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

/// Scripted loopback backend plus an isolated client context pointed at
/// it.
pub struct TestApp {
    pub port: u16,
    pub ctx: ApiContext,
}

impl TestApp {
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    /// Fresh context against this server with tweaked config, e.g. a
    /// different retry budget.
    pub fn context(&self, tweak: impl FnOnce(&mut ApiConfig)) -> ApiContext {
        let mut config = test_config(self.port);
        tweak(&mut config);
        ApiContext::new(config)
    }

    /// How many times the counting routes (/flaky, /always) were hit.
    pub async fn hits(&self) -> u32 {
        let url = format!("{}/hits", self.base_url());
        let value: serde_json::Value = reqwest::get(url)
            .await
            .expect("hit counter request failed")
            .json()
            .await
            .expect("hit counter returned malformed JSON");
        value["hits"].as_u64().unwrap_or(0) as u32
    }
}

fn test_config(port: u16) -> ApiConfig {
    ApiConfig {
        base_url: format!("http://127.0.0.1:{port}/api"),
        // keep retry waits short so retry tests run quickly
        retry_delay: Duration::from_millis(25),
        ..ApiConfig::default()
    }
}

/// Use an OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    let subscriber = client::telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("failed to bind test listener");
    let port = listener.local_addr().unwrap().port();
    let server = build(listener).expect("failed to build test server");
    tokio::spawn(server);

    TestApp {
        port,
        ctx: ApiContext::new(test_config(port)),
    }
}

/// Assert that a client call failed with a specific HTTP status.
pub fn assert_status<T: std::fmt::Debug>(
    result: Result<T, ApiError>,
    expected: reqwest::StatusCode,
) {
    match result {
        Err(ApiError::Status { status, .. }) => assert_eq!(status, expected),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[derive(Default)]
struct AppState {
    hits: AtomicU32,
}

/// Build the scripted server, but not await it.
pub fn build(listener: TcpListener) -> std::io::Result<Server> {
    let state = web::Data::new(AppState::default());
    let server = HttpServer::new(move || {
        App::new().app_data(state.clone()).service(
            web::scope("/api")
                .route("/system/health", web::get().to(health))
                .route("/auth/login", web::post().to(login))
                .route("/echo/auth", web::get().to(echo_auth))
                .route("/flaky/{fail_first}", web::get().to(flaky))
                .route("/always/{status}", web::get().to(always))
                .route("/hits", web::get().to(hits))
                .route("/slow/{ms}", web::get().to(slow))
                .route("/text", web::get().to(plain_text)),
        )
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok(server)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "services": {
            "database": {"status": "up", "response_time": "12ms"},
            "api": {"status": "up", "response_time": "45ms"}
        },
        "version": "1.0.0",
        "uptime": "7 days, 14 hours, 32 minutes",
        "timestamp": "2025-01-01T00:00:00Z"
    }))
}

async fn login(
    body: web::Json<payloads::requests::LoginCredentials>,
) -> HttpResponse {
    if body.email == "admin@example.com" && body.password == "123456" {
        HttpResponse::Ok().json(json!({
            "token": "server-token-1",
            "user": {
                "id": 1,
                "name": "Alice Warren",
                "email": "admin@example.com",
                "role": "admin",
                "avatar": null,
                "status": "active",
                "created_at": "2024-01-15T10:30:00Z"
            }
        }))
    } else {
        HttpResponse::Unauthorized().json(json!({
            "message": "Authentication failed: Invalid credentials"
        }))
    }
}

async fn echo_auth(req: HttpRequest) -> HttpResponse {
    let authorization = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    HttpResponse::Ok().json(json!({ "authorization": authorization }))
}

/// Fails the first `{fail_first}` hits with a 500, then reports how many
/// attempts it took.
async fn flaky(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> HttpResponse {
    let fail_first = path.into_inner();
    let attempt = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    if attempt <= fail_first {
        HttpResponse::InternalServerError()
            .json(json!({"message": "flaky failure"}))
    } else {
        HttpResponse::Ok().json(json!({ "attempts": attempt }))
    }
}

/// Always responds with the given status, counting every hit.
async fn always(
    state: web::Data<AppState>,
    path: web::Path<u16>,
) -> HttpResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let status = actix_web::http::StatusCode::from_u16(path.into_inner())
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({"message": "scripted failure"}))
}

async fn hits(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .json(json!({"hits": state.hits.load(Ordering::SeqCst)}))
}

async fn slow(path: web::Path<u64>) -> HttpResponse {
    tokio::time::sleep(Duration::from_millis(path.into_inner())).await;
    HttpResponse::Ok().json(json!({"message": "finally"}))
}

async fn plain_text() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("pong")
}
