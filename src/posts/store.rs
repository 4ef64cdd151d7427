//! Post storage.

use chrono::Utc;
use tracing::info;

use crate::db::{Db, PostCreate, PostOwner, PostRecord, PostUpdate, StoreError};
use crate::types::{PostId, UserId};

const POST_COLUMNS: &str =
    "id, title, description, image_url, image_file, created_at, author_id, author_username";

/// Post store for database operations.
#[derive(Debug, Clone)]
pub struct PostStore {
    db: Db,
}

impl PostStore {
    /// Create a new post store.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// All posts, newest first.
    pub async fn list_all(&self) -> Result<Vec<PostRecord>, StoreError> {
        let query = format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        );

        let posts = sqlx::query_as::<_, PostRecord>(&query)
            .fetch_all(&self.db)
            .await?;
        Ok(posts)
    }

    /// Posts written by one author, newest first.
    pub async fn list_by_author(&self, author_id: UserId) -> Result<Vec<PostRecord>, StoreError> {
        let query = format!(
            "SELECT {} FROM posts WHERE author_id = ? ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        );

        let posts = sqlx::query_as::<_, PostRecord>(&query)
            .bind(author_id)
            .fetch_all(&self.db)
            .await?;
        Ok(posts)
    }

    /// Get a single post by ID. Used by tests to read back stored rows.
    #[cfg(test)]
    pub async fn find_by_id(&self, post_id: PostId) -> Result<Option<PostRecord>, StoreError> {
        let query = format!("SELECT {} FROM posts WHERE id = ? LIMIT 1", POST_COLUMNS);

        let post = sqlx::query_as::<_, PostRecord>(&query)
            .bind(post_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(post)
    }

    /// Insert a post and return it as stored.
    pub async fn create(&self, create: &PostCreate) -> Result<PostRecord, StoreError> {
        let query = format!(
            r#"
            INSERT INTO posts (title, description, image_url, image_file, created_at, author_id, author_username)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, PostRecord>(&query)
            .bind(&create.title)
            .bind(&create.description)
            .bind(&create.image_url)
            .bind(&create.image_file)
            .bind(Utc::now())
            .bind(create.author_id)
            .bind(&create.author_username)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::MissingRow("post insert"))?;

        info!("Created post {} by {}", post.id, post.author_username);
        Ok(post)
    }

    /// Load the author and stored image of a post, if it exists.
    pub async fn find_owner(&self, post_id: PostId) -> Result<Option<PostOwner>, StoreError> {
        let owner = sqlx::query_as::<_, PostOwner>(
            "SELECT author_id, image_file FROM posts WHERE id = ? LIMIT 1",
        )
        .bind(post_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(owner)
    }

    /// Replace the editable fields of a post. Returns whether a row changed.
    pub async fn update(&self, post_id: PostId, update: &PostUpdate) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE posts SET title = ?, description = ?, image_url = ? WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image_url)
        .bind(post_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a post. Returns whether a row was removed.
    pub async fn delete(&self, post_id: PostId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() > 0 {
            info!("Deleted post {}", post_id);
        }
        Ok(result.rows_affected() > 0)
    }
}
