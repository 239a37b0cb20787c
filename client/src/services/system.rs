use super::{Backend, Services};
use crate::config::endpoints;
use crate::error::ApiError;
use payloads::responses::{SystemConfig, SystemHealth, VersionInfo};

impl Services {
    pub async fn get_config(&self) -> Result<SystemConfig, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.get_config().await,
            Backend::Http(transport) => {
                transport.get_json(endpoints::SYSTEM_CONFIG, Vec::new()).await
            }
        }
    }

    pub async fn health_check(&self) -> Result<SystemHealth, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.health_check().await,
            Backend::Http(transport) => {
                transport.get_json(endpoints::SYSTEM_HEALTH, Vec::new()).await
            }
        }
    }

    pub async fn get_version(&self) -> Result<VersionInfo, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.get_version().await,
            Backend::Http(transport) => {
                transport
                    .get_json(endpoints::SYSTEM_VERSION, Vec::new())
                    .await
            }
        }
    }
}
