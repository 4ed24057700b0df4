//! The one HTTP pipeline every repository goes through.
//!
//! `send` is the interceptor: it attaches the bearer token, and it is the
//! only place that looks at a 401 and decides to tear the session down.

pub mod dto;


use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult, REJECTED_MESSAGE};
use crate::session::Session;
use dto::{Envelope, ErrorBody};

/// Last path segments that authenticate themselves and never carry a token.
const AUTH_EXEMPT_SEGMENTS: &[&str] = &["login", "refresh"];

pub fn is_auth_exempt(path: &str) -> bool {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|segment| {
            AUTH_EXEMPT_SEGMENTS
                .iter()
                .any(|exempt| segment.eq_ignore_ascii_case(exempt))
        })
        .unwrap_or(false)
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> ApiResult<Self> {
        let base = config.normalized_base_url();
        let base_url = Url::parse(&base).map_err(|e| ApiError::Request {
            message: format!("Invalid base URL {base}: {e}"),
        })?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Request {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Start a request for `path`, relative to the configured base URL.
    pub fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Request {
                message: format!("Invalid request path {path}: {e}"),
            })?;
        Ok(self.http.request(method, url))
    }

    /// Send with credentials attached, then check the status for an expired session.
    pub async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let mut request = builder.build().map_err(|e| ApiError::Request {
            message: format!("Failed to build request: {e}"),
        })?;
        let path = request.url().path().to_string();
        let exempt = is_auth_exempt(&path);

        if !exempt {
            match self.session.token() {
                Some(token) => {
                    let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                        ApiError::Request {
                            message: "Stored token is not a valid header value".to_string(),
                        }
                    })?;
                    request.headers_mut().insert(AUTHORIZATION, value);
                }
                None => {
                    if self.session.is_logged_in() {
                        warn!(%path, "logged in without a token");
                        self.session.teardown();
                    }
                }
            }
        }

        debug!(method = %request.method(), %path, "sending request");
        let response = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::network)?;

        if !exempt && response.status() == StatusCode::UNAUTHORIZED && self.session.is_logged_in() {
            warn!(%path, "server rejected credentials");
            self.session.teardown();
        }

        Ok(response)
    }

    /// Send and decode the `data` of a `{success, message, data}` envelope.
    pub async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.fetch_with_status(builder).await.map(|(_, data)| data)
    }

    /// Like [`ApiClient::fetch`], also returning the 2xx status it came with.
    pub async fn fetch_with_status<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> ApiResult<(u16, T)> {
        let (status, body) = self.exchange(builder).await?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|_| ApiError::InvalidResponse { status })?;
        if envelope.success == Some(false) {
            return Err(rejected(status, envelope.message));
        }
        let data = envelope.data.ok_or(ApiError::InvalidResponse { status })?;
        Ok((status, data))
    }

    /// Send when only success matters. An empty body is success.
    pub async fn execute(&self, builder: RequestBuilder) -> ApiResult<()> {
        let (status, body) = self.exchange(builder).await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            Ok(envelope) if envelope.success == Some(false) => {
                Err(rejected(status, envelope.message))
            }
            _ => Ok(()),
        }
    }

    async fn exchange(&self, builder: RequestBuilder) -> ApiResult<(u16, String)> {
        let response = self.send(builder).await?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::network)?;
        if status.is_success() {
            Ok((status.as_u16(), body))
        } else {
            Err(error_from_body(status, &body))
        }
    }
}

fn rejected(status: u16, message: Option<String>) -> ApiError {
    ApiError::Application {
        status,
        message: message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| REJECTED_MESSAGE.to_string()),
    }
}

fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let code = status.as_u16();
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.best_message())
        .unwrap_or_else(|| ApiError::fallback_message(code));
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { message }
    } else {
        ApiError::Http {
            status: code,
            message,
        }
    }
}
