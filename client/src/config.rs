use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_RETRY_COUNT: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Transport configuration. All values are deployment-overridable; the
/// defaults match the backend's documented expectations.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Hard per-attempt deadline.
    pub timeout: Duration,
    /// Maximum number of automatic retries after the initial attempt.
    pub retry_count: u32,
    /// Fixed wait between retry attempts.
    pub retry_delay: Duration,
    /// Route service calls to the in-memory mock backend instead of the
    /// network.
    pub use_mock: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            use_mock: false,
        }
    }
}

impl ApiConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Environment variables can be set directly or loaded from a .env
    /// file in the project root:
    /// - API_BASE_URL: base URL of the backend, including the /api prefix
    /// - USE_MOCK: "1"/"true"/"yes" to route calls to the mock backend
    pub fn from_env() -> Self {
        // Silently ignored if no .env file exists
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(use_mock) = std::env::var("USE_MOCK") {
            config.use_mock = matches!(
                use_mock.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        config
    }
}

/// Relative endpoint paths. These strings are a compatibility contract
/// with the backend; do not change them without coordinating a backend
/// release.
pub mod endpoints {
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_LOGOUT: &str = "/auth/logout";
    pub const AUTH_REFRESH: &str = "/auth/refresh";
    pub const AUTH_REGISTER: &str = "/auth/register";
    pub const AUTH_PROFILE: &str = "/auth/profile";
    pub const AUTH_CHANGE_PASSWORD: &str = "/auth/change-password";

    pub const USER_LIST: &str = "/users";
    pub const USER_DETAIL: &str = "/users/:id";
    pub const USER_CREATE: &str = "/users";
    pub const USER_UPDATE: &str = "/users/:id";
    pub const USER_DELETE: &str = "/users/:id";

    pub const UPLOAD_IMAGE: &str = "/upload/image";
    pub const UPLOAD_FILE: &str = "/upload/file";
    pub const UPLOAD_AVATAR: &str = "/upload/avatar";

    pub const SYSTEM_CONFIG: &str = "/system/config";
    pub const SYSTEM_HEALTH: &str = "/system/health";
    pub const SYSTEM_VERSION: &str = "/system/version";

    /// Substitute the `:id` placeholder in a path template.
    pub fn with_id(path: &str, id: impl std::fmt::Display) -> String {
        path.replace(":id", &id.to_string())
    }
}

/// User-facing messages for each error class. Every status code in the
/// taxonomy maps to exactly one of these.
pub mod messages {
    pub const NETWORK: &str =
        "Network connection failed. Check your connection and try again.";
    pub const TIMEOUT: &str = "The request timed out. Please try again later.";
    pub const SERVER: &str =
        "Internal server error. Please try again later.";
    pub const UNAUTHORIZED: &str =
        "Your session has expired. Please sign in again.";
    pub const FORBIDDEN: &str =
        "You do not have permission to access this resource.";
    pub const NOT_FOUND: &str = "The requested resource does not exist.";
    pub const BAD_REQUEST: &str = "Invalid request parameters.";
    pub const UNKNOWN: &str = "Unknown error. Please try again later.";
}

/// The fixed status-code table. Codes outside the table fall back to the
/// server-provided message or the unknown-error message.
pub fn status_message(status: StatusCode) -> Option<&'static str> {
    match status.as_u16() {
        400 => Some(messages::BAD_REQUEST),
        401 => Some(messages::UNAUTHORIZED),
        403 => Some(messages::FORBIDDEN),
        404 => Some(messages::NOT_FOUND),
        500 | 502 | 503 | 504 => Some(messages::SERVER),
        _ => None,
    }
}
