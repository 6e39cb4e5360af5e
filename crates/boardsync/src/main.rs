mod app;
mod config;
mod error;
mod handlers;
mod response;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::Result;
use boardsync_auth::{AuthConfig, AuthState};
use boardsync_core::storage::KeyedStore;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, state::AppState};

/// Boardsync - Kanban boards with nested lists and cards
#[derive(Parser, Debug)]
#[command(name = "boardsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardsync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let auth_config = AuthConfig::from_env()?;

    let store = init_store(&config).await?;
    let sessions = init_sessions(&config).await?;
    let auth = AuthState::with_provider(sessions, auth_config)?;

    let state = AppState::new(store, auth);

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build the keyed item store selected at compile time.
async fn init_store(config: &Config) -> Result<Arc<dyn KeyedStore>> {
    #[cfg(feature = "inmemory")]
    {
        let _ = config;
        tracing::warn!("using in-memory storage; data is lost on restart");
        Ok(Arc::new(storage::InMemoryStore::new()))
    }

    #[cfg(feature = "dynamodb")]
    {
        let store = storage::DynamoDbStore::from_env(config.table_name.clone()).await?;
        tracing::info!(table = %store.table_name(), "using DynamoDB storage");
        Ok(Arc::new(store))
    }
}

/// Build the session store. Redis-backed when the `redis` feature is on,
/// in-memory otherwise.
#[cfg(not(feature = "redis"))]
async fn init_sessions(
    _config: &Config,
) -> Result<Arc<dyn boardsync_core::auth::SessionRepository>> {
    tracing::warn!("using in-memory sessions; logins are lost on restart");
    Ok(Arc::new(boardsync_auth::InMemorySessionStore::new()))
}

#[cfg(feature = "redis")]
async fn init_sessions(
    config: &Config,
) -> Result<Arc<dyn boardsync_core::auth::SessionRepository>> {
    use fred::prelude::{Builder, ClientLike, Config as RedisConfig};

    let redis_config = RedisConfig::from_url(&config.redis_url)?;
    let pool = Builder::from_config(redis_config).build_pool(4)?;
    pool.init().await?;

    tracing::info!("using Redis sessions");
    Ok(Arc::new(boardsync_auth::RedisSessionStore::new(pool)))
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
