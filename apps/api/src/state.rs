use sqlx::PgPool;

use crate::cache::ReadThroughCache;
use crate::config::Config;
use crate::resources::ResourceCache;
use crate::tones::store::PgToneStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Read-through value cache. Backed by Redis, or always-miss when Redis is off or down.
    pub cache: ReadThroughCache,
    /// External service URL cache with lazy revalidation.
    pub resources: ResourceCache,
    /// Tone table; also the `ToneLookup` used by the prompt compiler.
    pub tones: PgToneStore,
    pub config: Config,
}
