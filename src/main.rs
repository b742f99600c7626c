//! rfi_concierge - RFI Solicitation Backend API
//!
//! Backend API for managing Requests for Information across their
//! append-only version history, discovery day registrations, and
//! vendor notification fan-out.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rfi_concierge::api::{self, AppState};
use rfi_concierge::db;
use rfi_concierge::directory::PgUserDirectory;
use rfi_concierge::notify::{Dispatcher, LoggingMailer};
use rfi_concierge::store::PgDocumentStore;
use rfi_concierge::Config;

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rfi_concierge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    let api_router = api::create_router();

    // Axum layers are applied in reverse order (last added = first executed)
    // Order: logging -> context -> handler
    let api_routes = api_router
        .layer(middleware::from_fn(api::middleware::context_middleware))
        .layer(middleware::from_fn(api::middleware::logging_middleware));

    Router::new()
        // Health check (no context required)
        .route("/health", axum::routing::get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting rfi_concierge server");
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::ensure_schema(&pool).await?;
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");
    tracing::info!("Listening on http://{}", addr);

    let (dispatcher, worker) = Dispatcher::spawn(Arc::new(LoggingMailer), config.mail_timeout());

    let state = AppState {
        store: Arc::new(PgDocumentStore::new(pool.clone())),
        directory: Arc::new(PgUserDirectory::new(pool.clone())),
        dispatcher,
        ops_mailbox: config.ops_mailbox.clone(),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup. The router (and its state) is gone at this point, so the
    // worker exits once the queue drains.
    tracing::info!("Server shutting down...");
    if tokio::time::timeout(Duration::from_secs(10), worker).await.is_err() {
        tracing::warn!("Notification worker did not drain in time");
    }
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
