use std::sync::Arc;

use recommendation_service::{
    config::Config,
    db::{self, Cache, PgGraphStore},
    middleware::JwtVerifier,
    routes::{create_router, AppState},
    services::HttpCatalogClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;

    // Rating graph
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    if config.run_migrations {
        db::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    // Optional catalog cache
    let (cache, cache_writer) = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(
                db::create_redis_client(redis_url)?,
                config.catalog_timeout(),
            );
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, catalog caching disabled");
            (None, None)
        }
    };

    let catalog = HttpCatalogClient::new(&config.catalog_url, config.catalog_timeout(), cache)?;

    let state = AppState::new(
        Arc::new(PgGraphStore::new(pool)),
        Arc::new(catalog),
        JwtVerifier::new(&config.jwt_secret),
    );

    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Recommendation service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
