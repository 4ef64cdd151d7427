//! Post endpoints.

use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::api::{ApiError, AppState, parse_json};
use crate::auth::UserContext;
use crate::db::{PostCreate, PostRecord, PostUpdate};
use crate::posts::{OwnershipError, check_owner};
use crate::types::PostId;

/// JSON body of post creation and update.
#[derive(Debug, Default, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields collected from a create request, before anything is persisted.
#[derive(Debug, Default)]
struct PostForm {
    title: String,
    description: String,
    image_url: Option<String>,
    image: Option<(String, Bytes)>,
}

impl From<PostRequest> for PostForm {
    fn from(req: PostRequest) -> Self {
        Self {
            title: req.title.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            image_url: non_empty(req.image_url),
            image: None,
        }
    }
}

impl PostForm {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_empty() || self.description.is_empty() {
            return Err(ApiError::Validation(
                "Title and description required".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    PostId::from_str(raw).map_err(|_| ApiError::Validation("Invalid post ID".to_string()))
}

fn ownership_error(err: OwnershipError, action: &str) -> ApiError {
    match err {
        OwnershipError::NotFound => ApiError::NotFound("Post not found".to_string()),
        OwnershipError::Forbidden => {
            ApiError::Forbidden(format!("You can only {} your own posts", action))
        }
    }
}

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<PostRecord>>, ApiError> {
    let posts = state.posts.list_all().await?;
    Ok(Json(posts))
}

pub async fn list_mine(
    user: UserContext,
    State(state): State<AppState>,
) -> Result<Json<Vec<PostRecord>>, ApiError> {
    let posts = state.posts.list_by_author(user.user_id()).await?;
    Ok(Json(posts))
}

pub async fn create(
    user: UserContext,
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<PostRecord>), ApiError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("multipart/form-data"));

    let form = if is_multipart {
        let multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|e| form_error(e.status()))?;
        read_multipart(multipart).await?
    } else {
        let body = Bytes::from_request(req, &state)
            .await
            .map_err(|e| body_error(e.status(), "Invalid JSON"))?;
        PostForm::from(parse_json::<PostRequest>(&body)?)
    };

    form.validate()?;

    let image_file = match &form.image {
        Some((name, bytes)) => Some(
            state
                .uploads
                .save(name, bytes)
                .await
                .map_err(|e| ApiError::internal("Error saving file", e))?,
        ),
        None => None,
    };

    let create = PostCreate {
        title: form.title,
        description: form.description,
        image_url: form.image_url,
        image_file: image_file.clone(),
        author_id: user.user_id(),
        author_username: user.username().clone(),
    };

    match state.posts.create(&create).await {
        Ok(post) => Ok((StatusCode::CREATED, Json(post))),
        Err(e) => {
            if let Some(name) = image_file {
                state.uploads.remove(&name).await;
            }
            Err(ApiError::internal("Error creating post", e))
        }
    }
}

/// A body that tripped the upload cap is reported as such, anything else
/// as a malformed request.
fn body_error(status: StatusCode, malformed: &str) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Request body too large".to_string())
    } else {
        ApiError::Validation(malformed.to_string())
    }
}

fn form_error(status: StatusCode) -> ApiError {
    body_error(status, "Error parsing form")
}

fn field_error(err: MultipartError) -> ApiError {
    form_error(err.status())
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostForm, ApiError> {
    let mut form = PostForm::default();

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field.text().await.map_err(field_error)?,
            "description" => form.description = field.text().await.map_err(field_error)?,
            "image_url" => {
                form.image_url = non_empty(Some(field.text().await.map_err(field_error)?))
            }
            "image_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(field_error)?;
                // Browsers send an empty, unnamed part when no file was chosen.
                if !file_name.is_empty() {
                    form.image = Some((file_name, bytes));
                }
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(form)
}

pub async fn update(
    user: UserContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_post_id(&id)?;

    let owner = state.posts.find_owner(post_id).await?;
    check_owner(owner, &user).map_err(|e| ownership_error(e, "update"))?;

    let form = PostForm::from(parse_json::<PostRequest>(&body)?);
    form.validate()?;

    let update = PostUpdate {
        title: form.title,
        description: form.description,
        image_url: form.image_url,
    };

    if !state.posts.update(post_id, &update).await? {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    Ok(Json(json!({ "message": "Post updated successfully" })))
}

pub async fn delete(
    user: UserContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post_id = parse_post_id(&id)?;

    let owner = state.posts.find_owner(post_id).await?;
    let owner = check_owner(owner, &user).map_err(|e| ownership_error(e, "delete"))?;

    if !state.posts.delete(post_id).await? {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    if let Some(file) = owner.image_file.filter(|f| !f.is_empty()) {
        state.uploads.remove(&file).await;
    }

    Ok(Json(json!({ "message": "Post deleted successfully" })))
}
