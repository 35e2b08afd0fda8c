mod analytics;
mod cache;
mod config;
mod db;
mod errors;
mod models;
mod prompting;
mod resources;
mod routes;
mod settings;
mod state;
mod tones;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::redis_backend::RedisBackend;
use crate::cache::ReadThroughCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::resources::revalidate::{FallbackRevalidator, HttpProbeRevalidator, Revalidator};
use crate::resources::{PgResourceStore, ResourceCache};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tones::store::PgToneStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HumanReplies API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Redis connects lazily on first cache use
    let backend = if config.redis_enabled {
        RedisBackend::new(redis::Client::open(config.redis_url.clone())?)
    } else {
        info!("Redis cache disabled by configuration");
        RedisBackend::disabled()
    };
    let cache = ReadThroughCache::new(Arc::new(backend));

    // Service URL cache (probe strategy swappable via SERVICE_HEALTH_PROBE)
    let revalidator: Arc<dyn Revalidator> = if config.service_health_probe {
        Arc::new(HttpProbeRevalidator::new()?)
    } else {
        Arc::new(FallbackRevalidator)
    };
    let resources = ResourceCache::new(
        Arc::new(PgResourceStore::new(db.clone())),
        revalidator,
        chrono::Duration::seconds(config.service_cache_ttl_secs),
    );
    info!(
        "Service URL cache initialized (ttl: {}s, services: {})",
        config.service_cache_ttl_secs,
        config.services.names().collect::<Vec<_>>().join(", ")
    );

    let state = AppState {
        db: db.clone(),
        cache,
        resources,
        tones: PgToneStore::new(db),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the extension and dashboard hosts

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
