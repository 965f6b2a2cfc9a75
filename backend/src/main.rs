//! Library catalog backend entry point.
//!
//! All operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use catalog::config::Config;
use catalog::db::{Database, seed};
use catalog::services::{AuthConfig, AuthService, init_tracing};
use catalog::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    init_tracing(config.log_format);
    tracing::info!("Starting catalog backend");

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    tracing::info!(url = %config.database_url, "Database connected");

    if config.seed_on_startup {
        let result = seed::run_seeds(&db).await;
        tracing::debug!(
            authors = result.authors_inserted,
            books = result.books_inserted,
            failures = result.errors.len(),
            "Seeding finished"
        );
    }

    let jwt_secret = match &config.jwt_secret {
        Some(secret) => secret.clone(),
        None => db
            .secrets()
            .jwt_secret()
            .await
            .context("Failed to load persisted JWT secret")?,
    };
    let auth = Arc::new(AuthService::new(
        db.clone(),
        AuthConfig {
            jwt_secret,
            token_lifetime: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
        },
    ));

    let state = AppState::new(config.clone(), db.clone(), auth);
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let host = config.host.as_deref().unwrap_or("localhost");
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://{}:{}/graphql", host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    db.close().await;
    tracing::info!("Catalog backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
