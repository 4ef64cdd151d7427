//! Registration and login endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::{ApiError, AppState, parse_json};
use crate::db::StoreError;
use crate::types::Username;

/// Body of `/register` and `/login`.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful authentication response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: Username,
    pub message: String,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let req: CredentialsRequest = parse_json(&body)?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password required".to_string(),
        ));
    }

    let credentials = state.credentials;
    let password_hash = tokio::task::spawn_blocking(move || credentials.hash(&password))
        .await
        .map_err(|e| ApiError::internal("Password hashing task failed", e))?
        .map_err(|e| ApiError::internal("Error processing password", e))?;

    let user = state
        .users
        .create_user(&Username::new(username), &password_hash)
        .await
        .map_err(|e| match e {
            StoreError::Conflict => ApiError::Conflict("Username already exists".to_string()),
            other => ApiError::internal("Error creating user", other),
        })?;

    let token = state
        .auth
        .tokens()
        .mint(user.id, &user.username)
        .map_err(|e| ApiError::internal("Error generating token", e))?;

    info!("Registered user {}", user.username);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            username: user.username,
            message: "User registered successfully".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: CredentialsRequest = parse_json(&body)?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = state.users.find_by_username(&username).await?;

    // Unknown users are checked against a decoy so both failures cost one
    // full bcrypt verification.
    let credentials = state.credentials;
    let stored = match &user {
        Some(user) => user.password_hash.clone(),
        None => credentials.decoy_hash(),
    };
    let matches = tokio::task::spawn_blocking(move || credentials.verify(&password, &stored))
        .await
        .map_err(|e| ApiError::internal("Password verification task failed", e))?;

    let user = match user {
        Some(user) if matches => user,
        Some(user) => {
            warn!("Login failed for user {}", user.username);
            return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }
        None => {
            warn!("Login failed for unknown user");
            return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = state
        .auth
        .tokens()
        .mint(user.id, &user.username)
        .map_err(|e| ApiError::internal("Error generating token", e))?;

    info!("User {} logged in", user.username);
    Ok(Json(AuthResponse {
        token,
        username: user.username,
        message: "Login successful".to_string(),
    }))
}
