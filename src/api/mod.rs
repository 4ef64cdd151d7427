// REST API for the blog server

mod auth;
mod error;
mod posts;


use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    handler::Handler,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::auth::{AuthExtractor, CredentialManager, SessionTokenService, UserStore};
use crate::config::AppConfig;
use crate::db::Db;
use crate::posts::PostStore;
use crate::uploads::UploadStore;

pub use auth::{AuthResponse, CredentialsRequest};
pub use error::ApiError;
pub use posts::PostRequest;

/// Shared, cheaply cloned state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Db,
    pub auth: AuthExtractor,
    pub credentials: CredentialManager,
    pub users: UserStore,
    pub posts: PostStore,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: Db, config: &AppConfig) -> Self {
        let tokens = Arc::new(SessionTokenService::new(config.token_config()));

        Self {
            auth: AuthExtractor::new(tokens),
            credentials: CredentialManager::new(config.password_cost),
            users: UserStore::new(db.clone()),
            posts: PostStore::new(db.clone()),
            uploads: UploadStore::new(&config.upload_dir),
            db,
        }
    }
}

pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let static_dir = &config.static_dir;
    let index = static_dir.join("all-posts.html");

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/posts",
            get(posts::list_all)
                .post(posts::create.layer(DefaultBodyLimit::max(config.max_upload_bytes))),
        )
        .route("/posts/mine", get(posts::list_mine))
        .route("/posts/{id}", put(posts::update).delete(posts::delete))
        .route_service("/", ServeFile::new(&index))
        .route_service("/all-posts.html", ServeFile::new(&index))
        .route_service("/register.html", ServeFile::new(static_dir.join("register.html")))
        .route_service("/login.html", ServeFile::new(static_dir.join("login.html")))
        .route_service("/my-posts.html", ServeFile::new(static_dir.join("my-posts.html")))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Decode a JSON body, reporting any failure as a 400.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Rejected JSON body: {}", e);
        ApiError::Validation("Invalid JSON".to_string())
    })
}

async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    if let Err(e) = state.db.acquire().await {
        warn!("Health check could not reach the database: {}", e);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
