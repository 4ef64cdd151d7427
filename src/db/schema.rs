use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{PostId, UserId, Username};

/// Persisted representation of a registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    /// Row identifier assigned on registration.
    pub id: UserId,
    /// Unique login name; never changes after creation.
    pub username: Username,
    /// bcrypt secret-equivalent. Only the credential manager interprets it.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted representation of a post, also its JSON wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub description: String,
    /// External image reference supplied by the author.
    pub image_url: Option<String>,
    /// Name of an uploaded image inside the upload directory.
    pub image_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    /// Denormalized author name, copied from the user at creation time.
    pub author_username: Username,
}

/// Payload used when inserting a new post.
#[derive(Debug, Clone)]
pub struct PostCreate {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_file: Option<String>,
    pub author_id: UserId,
    pub author_username: Username,
}

/// Payload used when editing an existing post. The uploaded file is never
/// replaced by an edit.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// The ownership facts needed before mutating a post.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostOwner {
    pub author_id: UserId,
    pub image_file: Option<String>,
}
