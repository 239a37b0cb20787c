pub mod data;

use crate::error::ApiError;
use crate::services::{PageQuery, ProgressFn};
use jiff::Timestamp;
use payloads::requests::{
    ChangePassword, CreateUser, FileUpload, LoginCredentials, RefreshToken,
    RegisterUser, UpdateUser, UploadKind,
};
use payloads::responses::{
    FeatureFlags, LoginPayload, Paginated, ServiceStatus, SuccessMessage,
    SystemConfig, SystemHealth, SystemLimits, Thumbnails, TokenPair,
    UploadedFile, User, UserDetail, VersionInfo,
};
use payloads::{Role, UserId, UserStatus};
use rand::Rng;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Scales for the simulated imperfections. Production demos run with the
/// defaults; tests use `instant()` for determinism.
#[derive(Debug, Clone, Copy)]
pub struct MockSettings {
    /// Multiplier on the per-endpoint base latencies.
    pub latency_scale: f32,
    /// Multiplier on the per-endpoint failure rates.
    pub failure_scale: f32,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            latency_scale: 1.0,
            failure_scale: 1.0,
        }
    }
}

impl MockSettings {
    /// No latency, no injected failures.
    pub fn instant() -> Self {
        Self {
            latency_scale: 0.0,
            failure_scale: 0.0,
        }
    }
}

/// In-memory stand-in for the backend, used when the mock flag is set.
/// Shapes and credential rules match the real API's contract; latency
/// and sporadic failures are simulated so the demo behaves like a
/// network.
#[derive(Clone)]
pub struct MockApi {
    settings: MockSettings,
    users: Arc<Mutex<Vec<User>>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::with_settings(MockSettings::default())
    }

    pub fn with_settings(settings: MockSettings) -> Self {
        Self {
            settings,
            users: Arc::new(Mutex::new(data::seed_users())),
        }
    }

    /// Replace the dataset, e.g. to test pagination over a known size.
    pub fn seed_users(&self, users: Vec<User>) {
        *self.users.lock().unwrap() = users;
    }

    async fn delay(&self, base_ms: u64) {
        let scaled = (base_ms as f32 * self.settings.latency_scale) as u64;
        if scaled > 0 {
            tokio::time::sleep(Duration::from_millis(scaled)).await;
        }
    }

    fn maybe_fail(&self, rate: f32) -> Result<(), ApiError> {
        let effective = rate * self.settings.failure_scale;
        if effective > 0.0 && rand::thread_rng().r#gen::<f32>() < effective {
            return Err(ApiError::unknown("Simulated backend error"));
        }
        Ok(())
    }

    fn wrong_credentials() -> ApiError {
        ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid email or password".to_string(),
            body: None,
        }
    }

    fn not_found(message: &str) -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
            body: None,
        }
    }
}

/// Auth endpoints
impl MockApi {
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LoginPayload, ApiError> {
        self.delay(1_000).await;

        let accepted = matches!(
            (credentials.email.as_str(), credentials.password.as_str()),
            ("admin@example.com", "123456") | ("user@example.com", "123456")
        );
        if !accepted {
            return Err(Self::wrong_credentials());
        }
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == credentials.email)
            .cloned()
            .ok_or_else(Self::wrong_credentials)?;
        Ok(LoginPayload {
            token: format!("mock-token-{}", Uuid::new_v4()),
            user,
        })
    }

    pub async fn logout(&self) -> Result<SuccessMessage, ApiError> {
        self.delay(300).await;
        Ok(SuccessMessage {
            message: "Signed out".to_string(),
        })
    }

    pub async fn refresh_token(
        &self,
        _refresh: &RefreshToken,
    ) -> Result<TokenPair, ApiError> {
        self.delay(500).await;
        self.maybe_fail(0.05)?;
        Ok(TokenPair {
            token: format!("mock-token-{}", Uuid::new_v4()),
            refresh_token: format!("mock-refresh-{}", Uuid::new_v4()),
        })
    }

    pub async fn register(
        &self,
        details: &RegisterUser,
    ) -> Result<User, ApiError> {
        self.delay(1_000).await;
        self.insert_user(&details.name, &details.email, Role::User)
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.delay(300).await;
        // The demo session belongs to the seeded admin
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.role == Role::Admin)
            .cloned()
            .ok_or_else(|| Self::not_found("User not found"))
    }

    pub async fn change_password(
        &self,
        _details: &ChangePassword,
    ) -> Result<SuccessMessage, ApiError> {
        self.delay(800).await;
        Ok(SuccessMessage {
            message: "Password updated".to_string(),
        })
    }
}

/// User endpoints
impl MockApi {
    pub async fn list_users(
        &self,
        query: &PageQuery,
    ) -> Result<Paginated<User>, ApiError> {
        self.delay(800).await;
        self.maybe_fail(0.05)?;

        let name = filter_str(&query.filters, "name");
        let role = filter_str(&query.filters, "role");
        let status = filter_str(&query.filters, "status");

        let users = self.users.lock().unwrap();
        let filtered: Vec<User> = users
            .iter()
            .filter(|user| {
                name.as_deref()
                    .is_none_or(|name| user.name.contains(name))
            })
            .filter(|user| {
                role.as_deref()
                    .is_none_or(|role| user.role.to_string() == role)
            })
            .filter(|user| {
                status
                    .as_deref()
                    .is_none_or(|status| user.status.to_string() == status)
            })
            .cloned()
            .collect();

        Ok(data::paginate(&filtered, query.page, query.page_size))
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserDetail, ApiError> {
        self.delay(300).await;
        self.maybe_fail(0.03)?;

        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("User not found"))?;
        let permissions = match user.role {
            Role::Admin => vec![
                "read".to_string(),
                "write".to_string(),
                "delete".to_string(),
            ],
            Role::User => vec!["read".to_string()],
        };
        Ok(UserDetail {
            user,
            last_login: "2024-01-28T10:30:00Z".parse().unwrap(),
            login_count: rand::thread_rng().gen_range(1..=100),
            permissions,
        })
    }

    pub async fn create_user(
        &self,
        details: &CreateUser,
    ) -> Result<User, ApiError> {
        self.delay(1_000).await;
        self.maybe_fail(0.1)?;
        self.insert_user(&details.name, &details.email, details.role)
    }

    pub async fn update_user(
        &self,
        id: UserId,
        details: &UpdateUser,
    ) -> Result<User, ApiError> {
        self.delay(800).await;
        self.maybe_fail(0.08)?;

        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| Self::not_found("User not found"))?;
        if let Some(name) = &details.name {
            user.name = name.clone();
        }
        if let Some(email) = &details.email {
            user.email = email.clone();
        }
        if let Some(role) = details.role {
            user.role = role;
        }
        if let Some(status) = details.status {
            user.status = status;
        }
        user.updated_at = Some(Timestamp::now());
        Ok(user.clone())
    }

    pub async fn delete_user(
        &self,
        id: UserId,
    ) -> Result<SuccessMessage, ApiError> {
        self.delay(500).await;
        self.maybe_fail(0.05)?;

        let mut users = self.users.lock().unwrap();
        let position = users
            .iter()
            .position(|user| user.id == id)
            .ok_or_else(|| Self::not_found("User not found"))?;
        users.remove(position);
        Ok(SuccessMessage {
            message: "User deleted".to_string(),
        })
    }

    fn insert_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let next_id =
            users.iter().map(|user| user.id.0).max().unwrap_or(0) + 1;
        let initial = name.chars().next().unwrap_or('U');
        let user = User {
            id: UserId(next_id),
            name: name.to_string(),
            email: email.to_string(),
            role,
            avatar: Some(format!(
                "https://via.placeholder.com/40?text={initial}"
            )),
            status: UserStatus::Active,
            created_at: Timestamp::now(),
            updated_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Upload endpoints
impl MockApi {
    /// Simulated upload: progress is reported in ten steps before the
    /// result settles. Validation has already happened in the service
    /// layer.
    pub async fn upload(
        &self,
        kind: UploadKind,
        file: &FileUpload,
        progress: ProgressFn,
    ) -> Result<UploadedFile, ApiError> {
        for percent in (0..=100).step_by(10) {
            self.delay(100).await;
            progress(percent);
        }
        self.maybe_fail(0.05)?;

        let id = Uuid::new_v4();
        let url = format!(
            "https://cdn.example.com/uploads/{id}/{}",
            file.file_name
        );
        let thumbnails = matches!(kind, UploadKind::Avatar).then(|| {
            Thumbnails {
                small: format!("{url}?size=small"),
                medium: format!("{url}?size=medium"),
                large: format!("{url}?size=large"),
            }
        });
        Ok(UploadedFile {
            id,
            file_name: file.file_name.clone(),
            url,
            size: file.size(),
            content_type: file.content_type.clone(),
            uploaded_at: Timestamp::now(),
            thumbnails,
        })
    }
}

/// System endpoints
impl MockApi {
    pub async fn health_check(&self) -> Result<SystemHealth, ApiError> {
        self.delay(200).await;
        self.maybe_fail(0.02)?;

        let mut services = BTreeMap::new();
        services.insert(
            "database".to_string(),
            ServiceStatus {
                status: "up".to_string(),
                response_time: "12ms".to_string(),
            },
        );
        services.insert(
            "redis".to_string(),
            ServiceStatus {
                status: "up".to_string(),
                response_time: "3ms".to_string(),
            },
        );
        services.insert(
            "api".to_string(),
            ServiceStatus {
                status: "up".to_string(),
                response_time: "45ms".to_string(),
            },
        );
        Ok(SystemHealth {
            status: "healthy".to_string(),
            services,
            version: "1.0.0".to_string(),
            uptime: "7 days, 14 hours, 32 minutes".to_string(),
            timestamp: Timestamp::now(),
        })
    }

    pub async fn get_config(&self) -> Result<SystemConfig, ApiError> {
        self.delay(400).await;
        self.maybe_fail(0.03)?;

        Ok(SystemConfig {
            site_name: "adminboard".to_string(),
            version: "1.0.0".to_string(),
            environment: "development".to_string(),
            features: FeatureFlags {
                dark_mode: true,
                i18n: true,
                notifications: true,
            },
            limits: SystemLimits {
                max_file_size: "10MB".to_string(),
                max_users: 1000,
                session_timeout: "30min".to_string(),
            },
        })
    }

    pub async fn get_version(&self) -> Result<VersionInfo, ApiError> {
        self.delay(100).await;
        Ok(VersionInfo {
            version: "1.0.0".to_string(),
            build_time: "2024-01-28 10:00:00".to_string(),
            git_commit: "abc123def456".to_string(),
            environment: "development".to_string(),
        })
    }
}

fn filter_str(
    filters: &serde_json::Map<String, Value>,
    key: &str,
) -> Option<String> {
    filters.get(key).and_then(Value::as_str).map(str::to_owned)
}
