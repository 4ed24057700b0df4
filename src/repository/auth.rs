use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use super::AuthRepository;
use crate::api::dto::LoginDto;
use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::mapper::{clean, to_domain};
use crate::model::UserData;

pub struct HttpAuthRepository {
    client: Arc<ApiClient>,
}

impl HttpAuthRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    /// Exchange credentials for a token and start the session.
    async fn login(&self, email: &str, password: &str, remember_me: bool) -> ApiResult<UserData> {
        let builder = self
            .client
            .request(Method::POST, "login")?
            .json(&json!({ "email": email.trim(), "password": password }));
        let (status, dto): (u16, LoginDto) = self.client.fetch_with_status(builder).await?;

        let token = clean(dto.token).ok_or(ApiError::InvalidResponse { status })?;
        let user = to_domain(dto.user).unwrap_or_default();
        self.client
            .session()
            .start(&token, Some(&user), remember_me);
        tracing::info!(user = %user.display_name(), "logged in");
        Ok(user)
    }

    async fn refresh(&self) -> ApiResult<()> {
        let current = self.client.session().token();
        let builder = self
            .client
            .request(Method::POST, "refresh")?
            .json(&json!({ "token": current }));
        let (status, dto): (u16, LoginDto) = self.client.fetch_with_status(builder).await?;
        let token = clean(dto.token).ok_or(ApiError::InvalidResponse { status })?;
        self.client.session().replace_token(&token);
        Ok(())
    }

    /// Tell the server, then clear local state whatever it answered.
    async fn logout(&self) -> ApiResult<()> {
        let result: ApiResult<()> = async {
            let builder = self.client.request(Method::POST, "logout")?;
            self.client.execute(builder).await
        }
        .await;
        if let Err(err) = &result {
            tracing::warn!(code = err.code(), "server logout failed: {err}");
        }
        self.client.session().sign_out();
        Ok(())
    }
}
