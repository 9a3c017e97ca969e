use crate::models::UnitMismatch;
use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the habit service client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-200 response without a structured error body, or a connection-level failure
    /// (`status` is `None` for DNS, TLS, connect and timeout errors).
    #[error("{}", transport_message(.status, .message))]
    Transport { status: Option<u16>, message: String },

    /// Non-200 response whose body carried the service's error shape.
    #[error("{}", service_message(.reason, .detail))]
    Service {
        status: u16,
        reason: String,
        detail: Option<UnitMismatch>,
    },

    /// A 200 response whose body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    /// An id that cannot be placed in a URL path segment ("." or "..").
    #[error("habit id {0:?} is not a valid path segment")]
    InvalidId(String),
}

impl ClientError {
    pub fn status(status: u16) -> Self {
        Self::Transport {
            status: Some(status),
            message: "unexpected status".to_string(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn timed_out() -> Self {
        Self::connection("request timed out")
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Service { status, .. } => Some(*status),
            Self::Decode(_) | Self::Cancelled | Self::InvalidId(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::timed_out();
        }
        Self::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("{message}, {status}"),
        None => format!("transport error: {message}"),
    }
}

fn service_message(reason: &str, detail: &Option<UnitMismatch>) -> String {
    match detail {
        Some(detail) => format!(
            "{reason} (expected unit category {}, got {})",
            detail.expected_unit_category, detail.actual_unit_category
        ),
        None => reason.to_string(),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing HABITIFY_API_KEY env var")]
    MissingApiKey,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
