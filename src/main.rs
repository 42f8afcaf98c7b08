use std::sync::Arc;

use moovies::{
    api::{create_router, AppState},
    config::Config,
    db::{self, Cache, PgMembershipStore},
    services::{AuthProviderVerifier, TmdbCatalog},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moovies=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if config.tmdb_api_key.is_none() {
        tracing::warn!("TMDB_API_KEY is not set, catalog requests will fail");
    }
    if config.auth_credentials().is_none() {
        tracing::warn!("Auth client credentials are not set, list requests will fail");
    }

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let state = AppState::new(
        Arc::new(TmdbCatalog::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        )),
        Arc::new(PgMembershipStore::new(pool)),
        Arc::new(AuthProviderVerifier::new(&config, cache)),
    );

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
