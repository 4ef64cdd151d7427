//! Authentication extractor for HTTP requests.

use std::fmt;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::{debug, warn};

use crate::api::{ApiError, AppState};
use crate::auth::context::UserContext;
use crate::auth::token::{AuthError, SessionTokenService};

/// Reasons a request could not be tied to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The Authorization header is absent or empty
    MissingCredentials,
    /// The presented token failed verification
    InvalidToken(AuthError),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Authorization header required"),
            Self::InvalidToken(_) => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidToken(e) => Some(e),
            Self::MissingCredentials => None,
        }
    }
}

/// Remove the first `"Bearer "` occurrence from an Authorization value.
///
/// Matching is case-sensitive, so `"bearer xyz"` is passed through as-is and
/// will then fail verification.
pub fn strip_bearer(header: &str) -> String {
    header.replacen("Bearer ", "", 1)
}

/// Resolves the caller of a protected request from its Authorization header.
#[derive(Debug, Clone)]
pub struct AuthExtractor {
    tokens: Arc<SessionTokenService>,
}

impl AuthExtractor {
    pub fn new(tokens: Arc<SessionTokenService>) -> Self {
        Self { tokens }
    }

    /// Get the token service used for verification and minting.
    pub fn tokens(&self) -> &SessionTokenService {
        &self.tokens
    }

    /// Verify the Authorization header value and build the user context.
    ///
    /// Performs no storage access: the identity comes entirely from the token.
    pub fn extract_user(&self, authorization: Option<&str>) -> Result<UserContext, ExtractError> {
        let header = match authorization {
            Some(value) if !value.is_empty() => value,
            _ => return Err(ExtractError::MissingCredentials),
        };

        let token = strip_bearer(header);
        let claims = self
            .tokens
            .verify(&token)
            .map_err(ExtractError::InvalidToken)?;

        debug!("Authenticated request for user: {}", claims.username);
        Ok(UserContext::from(claims))
    }
}

impl FromRequestParts<AppState> for UserContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorization = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                warn!("Authorization header is not valid ASCII");
                ApiError::Unauthenticated("Invalid token".to_string())
            })?),
            None => None,
        };

        state.auth.extract_user(authorization).map_err(|e| {
            if let ExtractError::InvalidToken(cause) = &e {
                warn!("Rejected token on {} {}: {}", parts.method, parts.uri.path(), cause);
            }
            ApiError::Unauthenticated(e.to_string())
        })
    }
}
