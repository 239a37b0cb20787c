use super::{Backend, PageQuery, Services};
use crate::config::endpoints;
use crate::error::ApiError;
use payloads::UserId;
use payloads::requests::{CreateUser, UpdateUser};
use payloads::responses::{Paginated, SuccessMessage, User, UserDetail};

impl Services {
    pub async fn list_users(
        &self,
        query: &PageQuery,
    ) -> Result<Paginated<User>, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.list_users(query).await,
            Backend::Http(transport) => {
                transport
                    .get_json(endpoints::USER_LIST, query.to_params())
                    .await
            }
        }
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserDetail, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.get_user(id).await,
            Backend::Http(transport) => {
                transport
                    .get_json(
                        &endpoints::with_id(endpoints::USER_DETAIL, id),
                        Vec::new(),
                    )
                    .await
            }
        }
    }

    pub async fn create_user(
        &self,
        details: &CreateUser,
    ) -> Result<User, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.create_user(details).await,
            Backend::Http(transport) => {
                transport.post_json(endpoints::USER_CREATE, details).await
            }
        }
    }

    pub async fn update_user(
        &self,
        id: UserId,
        details: &UpdateUser,
    ) -> Result<User, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.update_user(id, details).await,
            Backend::Http(transport) => {
                transport
                    .put_json(
                        &endpoints::with_id(endpoints::USER_UPDATE, id),
                        details,
                    )
                    .await
            }
        }
    }

    pub async fn delete_user(
        &self,
        id: UserId,
    ) -> Result<SuccessMessage, ApiError> {
        match self.backend() {
            Backend::Mock(mock) => mock.delete_user(id).await,
            Backend::Http(transport) => {
                transport
                    .delete_json(&endpoints::with_id(
                        endpoints::USER_DELETE,
                        id,
                    ))
                    .await
            }
        }
    }
}
