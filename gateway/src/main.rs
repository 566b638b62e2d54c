//! Gateway main entry point
//!
//! HTTP server for the blog backend. Connects to PostgreSQL, applies the
//! schema, and serves the API until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use auth::JwtManager;
use post_service::{AccountService, PgAccountRepository, PgPostRepository, PostService};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::{build_router, AppState, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    info!("Starting blog gateway v{}", config.version);

    let jwt = JwtManager::new(&config.jwt)
        .context("JWT_SECRET_KEY must be set to a non-empty value")?;
    let jwt = Arc::new(jwt);

    let pool = db::connect_with_retry(&config.db)
        .await
        .context("could not connect to the database")?;
    db::run_migration_file(&pool, &config.migration_path)
        .await
        .with_context(|| format!("failed to apply {}", config.migration_path.display()))?;
    info!("Database ready");

    let posts = PostService::new(Arc::new(PgPostRepository::new(pool.clone())));
    let accounts = AccountService::new(
        Arc::new(PgAccountRepository::new(pool.clone())),
        jwt.clone(),
    );
    let state = AppState::new(posts, accounts, jwt).with_pool(pool);
    let app = build_router(state, Some(config.static_dir.clone()));

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
