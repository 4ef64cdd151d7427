//! User storage and lookup.

use chrono::Utc;
use tracing::info;

use crate::db::{Db, StoreError, UserRecord};
#[cfg(test)]
use crate::types::UserId;
use crate::types::Username;

/// User store for database operations.
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Db,
}

impl UserStore {
    /// Create a new user store.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert a new user with an already-hashed password.
    ///
    /// Returns [`StoreError::Conflict`] when the username is taken. The check
    /// is the table's unique constraint, so concurrent registrations of the
    /// same name cannot both succeed.
    pub async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let query = r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, created_at
        "#;

        let user = sqlx::query_as::<_, UserRecord>(query)
            .bind(username)
            .bind(password_hash)
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::MissingRow("user insert"))?;

        info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Get a user by username. Matching is exact and case-sensitive.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?
            LIMIT 1
        "#;

        let user = sqlx::query_as::<_, UserRecord>(query)
            .bind(username)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    /// Get a user by database ID. Handlers work from token claims, so only
    /// tests read users back this way.
    #[cfg(test)]
    pub async fn find_by_id(&self, user_id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let query = "SELECT id, username, password_hash, created_at FROM users WHERE id = ? LIMIT 1";

        let user = sqlx::query_as::<_, UserRecord>(query)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }
}
