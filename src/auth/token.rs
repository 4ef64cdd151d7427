//! Session token minting and verification.
//!
//! Tokens are HS256 JWTs carrying the user ID, username and an expiration
//! instant. Only a process holding the same signing secret can verify them.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{UserId, Username};

/// Default token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Signing configuration, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    /// Create a config with the default 24h lifetime.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub username: Username,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

/// Token verification errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The MAC does not match the process signing secret
    InvalidSignature,
    /// The expiration instant has passed
    Expired,
    /// The token could not be parsed
    Malformed(String),
    /// The token could not be signed
    Signing(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "Token signature is invalid"),
            Self::Expired => write!(f, "Token has expired"),
            Self::Malformed(msg) => write!(f, "Malformed token: {}", msg),
            Self::Signing(msg) => write!(f, "Token signing failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

/// Mints and verifies session tokens with a single immutable secret.
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionTokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            ttl: config.ttl,
        }
    }

    /// Mint a token for the user that expires `ttl` from now.
    pub fn mint(&self, user_id: UserId, username: &Username) -> Result<String, AuthError> {
        self.mint_at(user_id, username, Utc::now())
    }

    /// Mint a token as if issued at `issued_at`.
    pub fn mint_at(
        &self,
        user_id: UserId,
        username: &Username,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            user_id,
            username: username.clone(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the decoded claims.
    ///
    /// The signature is checked before the expiry, so a foreign token is
    /// reported as `InvalidSignature` even when it has also expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        debug!("Token verified for user {}", data.claims.user_id);
        Ok(data.claims)
    }
}

impl fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
