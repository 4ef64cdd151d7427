// Core modules
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod posts;
pub mod types;
pub mod uploads;

// Re-export key types and functions
pub use api::{ApiError, AppState, create_router};
pub use auth::{CredentialManager, SessionTokenService, TokenConfig, UserContext};
pub use config::AppConfig;
pub use db::{DatabaseConfig, create_connection, ensure_schema};

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

/// Convenience function to create a fully configured blog application.
///
/// Connects to the database, applies the schema, prepares the upload
/// directory and returns the router ready to be served.
pub async fn create_app(config: &AppConfig) -> Result<Router> {
    config.validate()?;

    let db = create_connection(config.database.clone()).await?;
    ensure_schema(&db).await?;
    info!("Database ready at {}", config.database.url);

    let state = AppState::new(db, config);
    state
        .uploads
        .ensure_dir()
        .await
        .with_context(|| format!("create upload dir {}", state.uploads.dir().display()))?;
    info!(
        "Uploads stored in {}, password cost {}",
        state.uploads.dir().display(),
        state.credentials.cost()
    );

    Ok(create_router(state, config))
}
