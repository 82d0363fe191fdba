//! # Curricula API Server
//!
//! HTTP API for the curricula learning platform: accounts with JWT bearer
//! authentication, and the course → module → lesson content hierarchy.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p curricula-api
//! ```

use curricula_api::{
    app::{build_router, AppState},
    config::Config,
};
use curricula_shared::{
    db::{migrations::run_migrations, pool::create_pool},
    supabase::{SupabaseClient, SupabaseError},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curricula_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        environment = config.api.environment.as_str(),
        "Curricula API v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    // Supabase is constructed exactly once, here, and injected; an
    // unconfigured deployment runs without it and the health endpoint
    // reports the flag.
    let supabase = match SupabaseClient::new(&config.supabase) {
        Ok(client) => {
            tracing::info!(url = client.base_url(), "supabase client configured");
            Some(Arc::new(client))
        }
        Err(SupabaseError::NotConfigured) => {
            tracing::warn!("supabase credentials not configured; managed auth/storage disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let addr = config.bind_address();
    let state = AppState::new(pool.clone(), config, supabase);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    curricula_shared::db::pool::close_pool(pool).await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("shutdown signal received");
}
