use super::{Backend, Services};
use crate::config::endpoints;
use crate::error::ApiError;
use payloads::requests::{
    ChangePassword, LoginCredentials, RefreshToken, RegisterUser,
};
use payloads::responses::{LoginPayload, SuccessMessage, TokenPair, User};

impl Services {
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<LoginPayload, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.login(credentials).await,
            Backend::Http(transport) => {
                transport
                    .post_json(endpoints::AUTH_LOGIN, credentials)
                    .await
            }
        }
    }

    pub async fn logout(&self) -> Result<SuccessMessage, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.logout().await,
            Backend::Http(transport) => {
                transport
                    .post_json(endpoints::AUTH_LOGOUT, &serde_json::json!({}))
                    .await
            }
        }
    }

    pub async fn refresh_token(
        &self,
        refresh: &RefreshToken,
    ) -> Result<TokenPair, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.refresh_token(refresh).await,
            Backend::Http(transport) => {
                transport.post_json(endpoints::AUTH_REFRESH, refresh).await
            }
        }
    }

    pub async fn register(
        &self,
        details: &RegisterUser,
    ) -> Result<User, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.register(details).await,
            Backend::Http(transport) => {
                transport.post_json(endpoints::AUTH_REGISTER, details).await
            }
        }
    }

    /// Profile of the currently authenticated user.
    pub async fn profile(&self) -> Result<User, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.profile().await,
            Backend::Http(transport) => {
                transport.get_json(endpoints::AUTH_PROFILE, Vec::new()).await
            }
        }
    }

    pub async fn change_password(
        &self,
        details: &ChangePassword,
    ) -> Result<SuccessMessage, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.change_password(details).await,
            Backend::Http(transport) => {
                transport
                    .post_json(endpoints::AUTH_CHANGE_PASSWORD, details)
                    .await
            }
        }
    }
}
