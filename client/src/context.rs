use crate::config::ApiConfig;
use crate::events::AuthEvents;
use crate::mock::MockApi;
use crate::services::Services;
use crate::storage::Storage;
use crate::toast::Toasts;
use crate::transport::Transport;
use std::sync::Arc;

/// Owned wiring for one API client instance: config, storage, the auth
/// event bus, the toast channel, the transport, and the service layer.
/// Everything that the original kept as module-level globals lives here,
/// so tests and embedders can hold isolated instances side by side.
#[derive(Clone)]
pub struct ApiContext {
    pub config: ApiConfig,
    pub storage: Storage,
    pub auth_events: AuthEvents,
    pub toasts: Toasts,
    pub transport: Arc<Transport>,
    pub services: Arc<Services>,
}

impl ApiContext {
    pub fn new(config: ApiConfig) -> Self {
        let storage = Storage::new();
        let auth_events = AuthEvents::new();
        let toasts = Toasts::new();
        let transport = Arc::new(Transport::new(
            config.clone(),
            storage.clone(),
            auth_events.clone(),
        ));
        let services = if config.use_mock {
            Arc::new(Services::mock(MockApi::new()))
        } else {
            Arc::new(Services::http(transport.clone()))
        };
        Self {
            config,
            storage,
            auth_events,
            toasts,
            transport,
            services,
        }
    }

    /// Context configured from the environment (.env honored).
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    /// Context routed at a specific mock backend, regardless of the
    /// config's mock flag. Used by tests that need deterministic mock
    /// settings or a seeded dataset.
    pub fn with_mock(config: ApiConfig, mock: MockApi) -> Self {
        let mut ctx = Self::new(config);
        ctx.services = Arc::new(Services::mock(mock));
        ctx
    }
}
