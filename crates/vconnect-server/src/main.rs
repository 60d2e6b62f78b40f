//! VolunteerConnect - volunteer coordination backend

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use vconnect_api::{AppState, create_router};
use vconnect_auth::JwtManager;
use vconnect_db::Database;

/// VolunteerConnect - volunteer coordination backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "VCONNECT_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "VCONNECT_PORT")]
    port: Option<u16>,

    /// Base64-encoded JWT signing secret
    #[arg(long, env = "VCONNECT_JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Token lifetime in milliseconds
    #[arg(long, env = "VCONNECT_TOKEN_TTL_MS")]
    token_ttl_ms: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting VolunteerConnect v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Create default admin user if no users exist
    if !db.has_users().await? {
        info!("Creating default admin user");
        let password_hash = vconnect_auth::hash_password("admin")?;
        db.insert_user(vconnect_db::NewUser {
            username: "admin".to_string(),
            password_hash,
            email: "admin@localhost".to_string(),
            first_name: "Default".to_string(),
            last_name: "Admin".to_string(),
            role: vconnect_db::Role::Admin,
        })
        .await?;
        warn!("Default admin user created (username: admin, password: admin) - change it");
    }

    // Initialize the token codec; the signing secret and TTL live here for
    // the process lifetime, nothing else holds them.
    let jwt_secret = args.jwt_secret.unwrap_or(config.auth.jwt_secret);
    let token_ttl_ms = args.token_ttl_ms.unwrap_or(config.auth.token_ttl_ms);
    let jwt = Arc::new(
        JwtManager::new(&jwt_secret, token_ttl_ms)
            .context("Failed to initialize token signing")?,
    );

    // Create application state
    let state = AppState::new(db, jwt);

    // Create router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
