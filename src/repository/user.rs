use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::UserRepository;
use crate::api::dto::{ListPayload, UserDto};
use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::mapper::to_domain_list;
use crate::model::UserData;

pub struct HttpUserRepository {
    client: Arc<ApiClient>,
}

impl HttpUserRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    async fn list(&self) -> ApiResult<Vec<UserData>> {
        let builder = self.client.request(Method::GET, "users")?;
        let payload: ListPayload<UserDto> = self.client.fetch(builder).await?;
        Ok(to_domain_list(payload.into_items()))
    }
}
