//! # Taskplane API Server
//!
//! HTTP server for the Taskplane task tracker: session authentication
//! (login, register, refresh, logout) and profile/statistics retrieval.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskplane-api
//! ```

use taskplane_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskplane_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskplane_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskplane API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool and apply migrations
    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    // Build application
    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
