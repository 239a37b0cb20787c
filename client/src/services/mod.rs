mod auth;
mod system;
mod upload;
mod users;

use crate::mock::MockApi;
use crate::transport::Transport;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Progress observer for uploads. Reported values are percentages; the
/// upload hook clamps them into [0, 100] before storing.
pub type ProgressFn = Arc<dyn Fn(i32) + Send + Sync>;

/// Pagination plus filters, merged into query parameters for list
/// endpoints.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: Map<String, Value>,
}

impl PageQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        for (key, value) in &self.filters {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            params.push((key.clone(), rendered));
        }
        params
    }
}

enum Backend {
    Http(Arc<Transport>),
    Mock(MockApi),
}

/// Typed entry points for every backend resource. Each function either
/// goes over the transport or, when constructed in mock mode, calls the
/// in-memory mock backend with simulated latency.
pub struct Services {
    backend: Backend,
}

impl Services {
    pub fn http(transport: Arc<Transport>) -> Self {
        Self {
            backend: Backend::Http(transport),
        }
    }

    pub fn mock(mock: MockApi) -> Self {
        Self {
            backend: Backend::Mock(mock),
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock(_))
    }

    fn backend(&self) -> &Backend {
        &self.backend
    }
}
