use thiserror::Error;

pub const GENERIC_NETWORK_MESSAGE: &str = "Network error, please check your connection";
pub const INVALID_RESPONSE_MESSAGE: &str = "Unexpected response from server";
pub const REJECTED_MESSAGE: &str = "The server rejected the request";

/// Every failure a data-access call can report. Callers that only want the
/// uniform pair use [`ApiError::message`] and [`ApiError::code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (DNS, refused, reset, timeout).
    #[error("{message}")]
    Network { message: String },

    /// The request could not be built before sending.
    #[error("{message}")]
    Request { message: String },

    /// HTTP 401. Session teardown has already been decided by the pipeline.
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx with `success: false` in the body.
    #[error("{message}")]
    Application { status: u16, message: String },

    /// 2xx with a body that is missing or does not decode.
    #[error("Unexpected response from server")]
    InvalidResponse { status: u16 },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        ApiError::Network {
            message: format!("{GENERIC_NETWORK_MESSAGE} ({err})"),
        }
    }

    /// Fallback text for an HTTP failure with no usable body.
    pub fn fallback_message(status: u16) -> String {
        format!("Request failed with status {status}")
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status, or 0 when nothing came back from the server.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Network { .. } | ApiError::Request { .. } => 0,
            ApiError::Unauthorized { .. } => 401,
            ApiError::Http { status, .. }
            | ApiError::Application { status, .. }
            | ApiError::InvalidResponse { status } => *status,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}
