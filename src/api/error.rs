//! HTTP boundary error type.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::db::StoreError;

/// Error returned by every handler. Bodies are plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or incomplete input (400)
    Validation(String),
    /// Missing or unverifiable identity (401)
    Unauthenticated(String),
    /// Identity is valid but lacks rights to the resource (403)
    Forbidden(String),
    /// The addressed resource does not exist (404)
    NotFound(String),
    /// The write collides with existing data (409)
    Conflict(String),
    /// The request body exceeded the configured upload cap (413)
    PayloadTooLarge(String),
    /// Anything else. The message is logged, never sent (500)
    Internal(String),
}

impl ApiError {
    pub fn internal(context: &str, cause: impl fmt::Display) -> Self {
        Self::Internal(format!("{}: {}", context, cause))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::PayloadTooLarge(msg)
            | Self::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal("Database error", err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Internal(cause) => {
                error!("Internal error: {}", cause);
                "Internal server error".to_string()
            }
            Self::Validation(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::PayloadTooLarge(msg) => msg,
        };

        (status, body).into_response()
    }
}
