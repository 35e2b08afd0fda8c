//! Read-through value cache for cheap aggregate reads.
//!
//! Values are stored as JSON in a `CacheBackend`. Backend trouble is never surfaced to
//! callers: a failed read is a miss and a failed write is dropped. Concurrent misses on
//! the same key each run the loader; the last store wins.

pub mod redis_backend;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Key-value store with per-entry expiry. Implementations swallow their own errors.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl_seconds: u64);
}

#[derive(Clone)]
pub struct ReadThroughCache {
    backend: Arc<dyn CacheBackend>,
}

impl ReadThroughCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Cached value for {key} is not valid JSON: {e}");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.backend.set(key, raw, ttl_seconds).await,
            Err(e) => debug!("Could not serialize value for {key}: {e}"),
        }
    }

    /// Returns `(value, was_cached)`. On a miss the loader runs and its result is stored
    /// for `ttl_seconds`. Loader errors propagate; nothing is stored in that case.
    pub async fn cached<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: u64,
        loader: F,
    ) -> Result<(T, bool), E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get_json(key).await {
            return Ok((value, true));
        }

        let value = loader().await?;
        self.set_json(key, &value, ttl_seconds).await;

        Ok((value, false))
    }
}
