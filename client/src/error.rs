use crate::config::{messages, status_message};
use reqwest::StatusCode;
use serde_json::Value;

/// The single error shape surfaced from the transport boundary. Every
/// failure cause — connectivity, timeout, HTTP status, client-side
/// validation — is normalized into one of these variants before it
/// reaches service or hook code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request was cancelled because an identical newer request
    /// replaced it in the pending registry. Callers must not surface
    /// this as an error toast.
    #[error("request superseded by a newer identical request")]
    Superseded,
    /// The per-attempt deadline elapsed with no response.
    #[error("{}", messages::TIMEOUT)]
    Timeout,
    /// No response was received for a reason other than the deadline.
    /// The low-level error text is kept for diagnostics.
    #[error("{}", messages::NETWORK)]
    Network { detail: String },
    /// The server answered with a non-success status. `message` is the
    /// user-facing rendition from the fixed status table; `body` is the
    /// raw response payload, if it parsed as JSON.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },
    /// Rejected client-side before any network activity.
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    Unknown { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Normalize a transport-level reqwest failure (no HTTP response).
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network {
                detail: error.to_string(),
            }
        }
    }

    /// Classify a non-success HTTP response. The fixed status table wins
    /// for the codes it covers; 400 and unlisted codes prefer the
    /// server-provided message.
    pub fn from_status(status: StatusCode, body: Option<Value>) -> Self {
        let server_message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let message = match status {
            StatusCode::BAD_REQUEST => server_message
                .unwrap_or_else(|| messages::BAD_REQUEST.to_string()),
            _ => match status_message(status) {
                Some(fixed) => fixed.to_string(),
                None => server_message
                    .unwrap_or_else(|| messages::UNKNOWN.to_string()),
            },
        };
        Self::Status {
            status,
            message,
            body,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    /// Retry is reserved for failures where a later attempt can
    /// plausibly succeed: no response received, or a 5xx answer.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Network { .. } => true,
            Self::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// The message the server included in its response body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { body: Some(body), .. } => {
                body.get("message").and_then(Value::as_str)
            }
            _ => None,
        }
    }
}
