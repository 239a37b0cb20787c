use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::events::{AuthEvent, AuthEvents};
use crate::storage::{Storage, keys};
use payloads::requests::FileUpload;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use uuid::Uuid;

/// One logical HTTP call. A descriptor survives across retry attempts;
/// `retries_used` counts how many have been consumed.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub payload: Payload,
    pub timeout: Option<Duration>,
    retries_used: u32,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Value),
    /// Multipart form with a single file part. Kept as owned bytes so
    /// the form can be rebuilt for each retry attempt.
    Multipart {
        field: &'static str,
        file: FileUpload,
    },
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            payload: Payload::Empty,
            timeout: None,
            retries_used: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    pub fn with_file(
        mut self,
        field: &'static str,
        file: FileUpload,
    ) -> Self {
        self.payload = Payload::Multipart { field, file };
        self
    }

    /// Override the per-attempt deadline for this call only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Identity of this call for duplicate detection: method + path +
    /// serialized params. The body is deliberately excluded, matching
    /// the duplicate-submission semantics of the UI layer.
    pub fn dedupe_key(&self) -> String {
        let params: BTreeMap<&str, &str> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let serialized = serde_json::to_string(&params)
            .unwrap_or_else(|_| String::from("{}"));
        format!("{}_{}_{}", self.method, self.path, serialized)
    }
}

struct PendingEntry {
    id: Uuid,
    cancel: oneshot::Sender<()>,
}

/// HTTP client wrapper. Owns the pending-request registry and performs
/// the request/response interceptor work around every call:
///
/// - request phase: cancel-and-replace in-flight duplicates, attach the
///   bearer token from storage, stamp the start time;
/// - response phase: clear the registry entry, normalize the payload,
///   classify failures, retry network/5xx errors a bounded number of
///   times, and wipe credentials + broadcast a logout on 401.
pub struct Transport {
    config: ApiConfig,
    http: reqwest::Client,
    storage: Storage,
    auth_events: AuthEvents,
    pending: Mutex<HashMap<String, PendingEntry>>,
}

impl Transport {
    pub fn new(
        config: ApiConfig,
        storage: Storage,
        auth_events: AuthEvents,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");
        Self {
            config,
            http,
            storage,
            auth_events,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issue a request, driving the full interceptor pipeline including
    /// bounded retry. Rejections are always `ApiError`; a superseded
    /// request rejects with the cancellation marker and is never
    /// retried.
    pub async fn send(
        &self,
        mut descriptor: RequestDescriptor,
    ) -> Result<Value, ApiError> {
        loop {
            match self.dispatch(&descriptor).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_superseded() => return Err(err),
                Err(err)
                    if err.is_retryable()
                        && descriptor.retries_used
                            < self.config.retry_count =>
                {
                    descriptor.retries_used += 1;
                    tracing::info!(
                        path = %descriptor.path,
                        attempt = descriptor.retries_used,
                        max = self.config.retry_count,
                        "retrying request"
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt: request-phase interceptors, the raced HTTP exchange,
    /// and response-phase cleanup/classification.
    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Value, ApiError> {
        let key = descriptor.dedupe_key();
        let id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().unwrap();
            if let Some(previous) = pending.insert(
                key.clone(),
                PendingEntry {
                    id,
                    cancel: cancel_tx,
                },
            ) {
                // At most one live entry per key: the newcomer wins
                let _ = previous.cancel.send(());
            }
        }

        let started = Instant::now();
        tracing::debug!(
            method = %descriptor.method,
            path = %descriptor.path,
            "sending request"
        );

        let result = tokio::select! {
            _ = cancel_rx => Err(ApiError::Superseded),
            result = self.perform(descriptor) => result,
        };

        self.release(&key, id);

        let elapsed = started.elapsed();
        match &result {
            Ok(_) => tracing::debug!(
                method = %descriptor.method,
                path = %descriptor.path,
                ?elapsed,
                "request succeeded"
            ),
            Err(ApiError::Superseded) => tracing::debug!(
                path = %descriptor.path,
                "request superseded"
            ),
            Err(err) => tracing::debug!(
                method = %descriptor.method,
                path = %descriptor.path,
                ?elapsed,
                %err,
                "request failed"
            ),
        }
        result
    }

    async fn perform(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Value, ApiError> {
        let url = self.format_url(&descriptor.path);
        let mut request = self
            .http
            .request(descriptor.method.clone(), url)
            .timeout(descriptor.timeout.unwrap_or(self.config.timeout));
        if !descriptor.params.is_empty() {
            request = request.query(&descriptor.params);
        }
        match &descriptor.payload {
            Payload::Empty => {}
            Payload::Json(body) => request = request.json(body),
            Payload::Multipart { field, file } => {
                let part = multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(ApiError::from_reqwest)?;
                request =
                    request.multipart(multipart::Form::new().part(*field, part));
            }
        }
        if let Some(token) = self.storage.get::<String>(keys::AUTH_TOKEN) {
            request = request.bearer_auth(token);
        }

        let response =
            request.send().await.map_err(ApiError::from_reqwest)?;
        self.normalize(response).await
    }

    async fn normalize(
        &self,
        response: reqwest::Response,
    ) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_reqwest)?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if status.is_success() {
            // Structured payloads pass through as parsed JSON; anything
            // else is surfaced as the raw body text
            return Ok(body.unwrap_or(Value::String(text)));
        }
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
        }
        Err(ApiError::from_status(status, body))
    }

    /// Remove our registry entry, but only if it is still ours: a
    /// superseded request must not evict its replacement.
    fn release(&self, key: &str, id: Uuid) {
        let mut pending = self.pending.lock().unwrap();
        if pending.get(key).is_some_and(|entry| entry.id == id) {
            pending.remove(key);
        }
    }

    fn expire_session(&self) {
        self.storage.remove(keys::AUTH_TOKEN);
        self.storage.remove(keys::USER_PROFILE);
        self.auth_events.emit(AuthEvent::LoggedOut);
        tracing::info!("session expired; stored credentials cleared");
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

/// Typed convenience methods mirroring the per-verb helpers of the
/// service layer.
impl Transport {
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        decode(
            self.send(RequestDescriptor::get(path).with_params(params))
                .await?,
        )
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, ApiError> {
        decode(
            self.send(RequestDescriptor::post(path).with_json(to_value(body)?))
                .await?,
        )
    }

    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, ApiError> {
        decode(
            self.send(RequestDescriptor::put(path).with_json(to_value(body)?))
                .await?,
        )
    }

    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        decode(self.send(RequestDescriptor::delete(path)).await?)
    }

    pub async fn upload_json<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &'static str,
        file: &FileUpload,
    ) -> Result<T, ApiError> {
        decode(
            self.send(
                RequestDescriptor::post(path).with_file(field, file.clone()),
            )
            .await?,
        )
    }
}

/// Deserialize a normalized payload into the expected response type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| {
        ApiError::unknown(format!("unexpected response shape: {err}"))
    })
}

fn to_value(body: &(impl Serialize + ?Sized)) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| {
        ApiError::unknown(format!("request body failed to serialize: {err}"))
    })
}
