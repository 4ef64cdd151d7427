use std::path::PathBuf;

use anyhow::Result;
use blog_server::auth::{DEFAULT_PASSWORD_COST, DEFAULT_TOKEN_TTL_HOURS};
use blog_server::config::{DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES};
use blog_server::{AppConfig, DatabaseConfig, create_app};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blog-server")]
#[command(about = "Multi-user blog backend with token authentication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Server {
        /// Bind address, e.g. 0.0.0.0:9080
        #[arg(long, env = "BLOG_BIND", default_value = DEFAULT_BIND)]
        bind: String,
        #[arg(long, env = "BLOG_DATABASE_URL", default_value = "sqlite://blog.db")]
        db_url: String,
        /// HMAC secret for session tokens (random per process if unset)
        #[arg(long, env = "BLOG_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
        #[arg(long, env = "BLOG_UPLOAD_DIR", default_value = "uploads")]
        upload_dir: PathBuf,
        #[arg(long, env = "BLOG_STATIC_DIR", default_value = "static")]
        static_dir: PathBuf,
        /// Maximum request body size for post creation, in bytes
        #[arg(long, env = "BLOG_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,
        /// bcrypt work factor for new passwords
        #[arg(long, env = "BLOG_PASSWORD_COST", default_value_t = DEFAULT_PASSWORD_COST)]
        password_cost: u32,
        /// Session token lifetime in hours
        #[arg(long, env = "BLOG_TOKEN_TTL_HOURS", default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
        token_ttl_hours: i64,
    },
    /// Initialize the database
    Init {
        #[arg(long, env = "BLOG_DATABASE_URL", default_value = "sqlite://blog.db")]
        db_url: String,
    },
}

const DEFAULT_LOG_FILTER: &str = "blog_server=info,tower_http=info";

/// `RUST_LOG` when set, otherwise info for this crate and the HTTP layer.
fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_LOG_FILTER);
    Ok(EnvFilter::try_new(directives)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref())?)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            bind,
            db_url,
            jwt_secret,
            upload_dir,
            static_dir,
            max_upload_bytes,
            password_cost,
            token_ttl_hours,
        } => {
            let config = AppConfig {
                bind,
                database: DatabaseConfig {
                    url: db_url,
                    ..Default::default()
                },
                jwt_secret,
                upload_dir,
                static_dir,
                max_upload_bytes,
                password_cost,
                token_ttl_hours,
            };
            info!("Starting blog server with {:?}", config);

            let app = create_app(&config).await?;
            let listener = tokio::net::TcpListener::bind(&config.bind).await?;
            info!("Server listening on http://{}", config.bind);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!("Server stopped");
        }
        Commands::Init { db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for initialization: {}", db_config.url);

            info!("Initializing database...");
            let db = blog_server::create_connection(db_config).await?;
            blog_server::ensure_schema(&db).await?;
            info!("Database initialized successfully");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
