use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;

pub type Db = SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("BLOG_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://blog.db".to_string()),
            max_connections: env::var("BLOG_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}

impl DatabaseConfig {
    /// Config for a private in-memory database, used by tests and `--db-url memory`.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    fn is_memory(&self) -> bool {
        is_memory_url(&self.url)
    }
}

fn is_memory_url(url: &str) -> bool {
    url == "memory" || url.contains(":memory:") || url.contains("mode=memory")
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let url = if config.url == "memory" {
        "sqlite::memory:".to_string()
    } else {
        config.url.clone()
    };

    let options = SqliteConnectOptions::from_str(&url)
        .with_context(|| format!("parse database url {}", url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if is_memory_url(&url) {
        // An in-memory database disappears with its last connection, so keep
        // exactly one alive for the lifetime of the pool.
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
    }
    .with_context(|| format!("connect to database via {}", url))?;

    Ok(pool)
}

pub async fn ensure_schema(db: &Db) -> Result<()> {
    let schema_queries = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        )"#,
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT NOT NULL,
            description     TEXT NOT NULL,
            image_url       TEXT,
            image_file      TEXT,
            created_at      TEXT NOT NULL,
            author_id       INTEGER NOT NULL REFERENCES users(id),
            author_username TEXT NOT NULL
        )"#,
        "CREATE INDEX IF NOT EXISTS posts_created_at ON posts (created_at)",
        "CREATE INDEX IF NOT EXISTS posts_author_created_at ON posts (author_id, created_at)",
    ];

    for query in schema_queries {
        sqlx::query(query)
            .execute(db)
            .await
            .with_context(|| format!("apply schema: {}", query.trim().lines().next().unwrap_or_default()))?;
    }

    Ok(())
}
