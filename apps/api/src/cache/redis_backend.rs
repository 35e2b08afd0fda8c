//! Redis cache backend with a lazily established, process-wide connection.
//!
//! The first cache call runs exactly one connect + PING attempt; concurrent callers
//! wait on it. If that attempt fails the backend stays disabled for the lifetime of
//! the process and every read is a miss.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::CacheBackend;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RedisBackend {
    client: Option<redis::Client>,
    connection: OnceCell<Option<MultiplexedConnection>>,
}

impl RedisBackend {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client: Some(client),
            connection: OnceCell::new(),
        }
    }

    /// A backend that never connects; every read misses.
    pub fn disabled() -> Self {
        Self {
            client: None,
            connection: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let client = self.client.as_ref()?;

        self.connection
            .get_or_init(|| async {
                match connect(client).await {
                    Ok(conn) => {
                        info!("Redis cache connected");
                        Some(conn)
                    }
                    Err(e) => {
                        warn!("Redis connection failed, disabling cache: {e}");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

async fn connect(client: &redis::Client) -> Result<MultiplexedConnection, redis::RedisError> {
    let mut conn = tokio::time::timeout(
        CONNECT_TIMEOUT,
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| {
        redis::RedisError::from((redis::ErrorKind::IoError, "connection timed out"))
    })??;

    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(conn)
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;

        let result: Result<Option<String>, _> =
            redis::cmd("GET").arg(key).query_async(&mut conn).await;
        match result {
            Ok(value) => value,
            Err(e) => {
                debug!("Redis get failed for {key}: {e}");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let result: Result<(), _> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await;
        if let Err(e) = result {
            debug!("Redis set failed for {key}: {e}");
        }
    }
}
