use std::fmt;
use std::path::PathBuf;

use chrono::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{
    DEFAULT_PASSWORD_COST, DEFAULT_TOKEN_TTL_HOURS, MAX_PASSWORD_COST, MIN_PASSWORD_COST, TokenConfig,
};
use crate::db::DatabaseConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:9080";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Runtime settings for the HTTP server.
#[derive(Clone)]
pub struct AppConfig {
    pub bind: String,
    pub database: DatabaseConfig,
    /// HMAC key for session tokens. `None` means a random per-process key.
    pub jwt_secret: Option<String>,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Request body cap on post creation
    pub max_upload_bytes: usize,
    pub password_cost: u32,
    pub token_ttl_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database: DatabaseConfig::default(),
            jwt_secret: None,
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            password_cost: DEFAULT_PASSWORD_COST,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

impl AppConfig {
    /// Check value ranges before anything is started.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.password_cost) {
            anyhow::bail!(
                "password cost must be between {} and {}, got {}",
                MIN_PASSWORD_COST,
                MAX_PASSWORD_COST,
                self.password_cost
            );
        }
        if self.token_ttl_hours <= 0 {
            anyhow::bail!("token TTL must be positive, got {}h", self.token_ttl_hours);
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max upload size must be positive");
        }
        Ok(())
    }

    /// Build the token signing configuration.
    ///
    /// Without a configured secret a random one is generated, so tokens do
    /// not survive a restart.
    pub fn token_config(&self) -> TokenConfig {
        let secret = match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                warn!("No JWT secret configured; using a random per-process secret");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        TokenConfig::new(secret).with_ttl(Duration::hours(self.token_ttl_hours))
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind", &self.bind)
            .field("database", &self.database)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("upload_dir", &self.upload_dir)
            .field("static_dir", &self.static_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("password_cost", &self.password_cost)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind, "0.0.0.0:9080");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.password_cost, 14);
        assert_eq!(config.token_ttl_hours, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let low_cost = AppConfig {
            password_cost: 2,
            ..Default::default()
        };
        assert!(low_cost.validate().is_err());

        let zero_ttl = AppConfig {
            token_ttl_hours: 0,
            ..Default::default()
        };
        assert!(zero_ttl.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig {
            jwt_secret: Some("hunter2-signing-key".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2-signing-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_token_config_uses_ttl() {
        let config = AppConfig {
            jwt_secret: Some("secret".to_string()),
            token_ttl_hours: 2,
            ..Default::default()
        };
        assert_eq!(config.token_config().ttl(), Duration::hours(2));
    }

    #[test]
    fn test_random_secrets_differ() {
        use crate::auth::SessionTokenService;
        use crate::types::{UserId, Username};

        let config = AppConfig::default();
        let a = SessionTokenService::new(config.token_config());
        let b = SessionTokenService::new(config.token_config());

        let token = a.mint(UserId::new(1), &Username::new("alice")).unwrap();
        assert!(a.verify(&token).is_ok());
        assert!(b.verify(&token).is_err());
    }
}
