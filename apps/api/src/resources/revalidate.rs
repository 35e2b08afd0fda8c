//! Revalidation strategies: decide which address a stale resource record should carry.
//!
//! `FallbackRevalidator` trusts the configured fallback unconditionally.
//! `HttpProbeRevalidator` checks that the fallback actually answers before accepting it.
//!
//! `ResourceCache` holds an `Arc<dyn Revalidator>`, chosen at startup via config.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::resource::CachedResource;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum RevalidationError {
    #[error("health probe failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service answered with status {status}")]
    Unhealthy { status: u16 },
}

#[async_trait]
pub trait Revalidator: Send + Sync {
    /// Returns the address the record should carry from now on.
    async fn revalidate(
        &self,
        name: &str,
        fallback_address: &str,
        previous: Option<&CachedResource>,
    ) -> Result<String, RevalidationError>;
}

/// Always answers with the fallback address.
pub struct FallbackRevalidator;

#[async_trait]
impl Revalidator for FallbackRevalidator {
    async fn revalidate(
        &self,
        _name: &str,
        fallback_address: &str,
        _previous: Option<&CachedResource>,
    ) -> Result<String, RevalidationError> {
        Ok(fallback_address.to_string())
    }
}

/// Issues a GET against the fallback address; anything below 500 counts as healthy.
#[derive(Clone)]
pub struct HttpProbeRevalidator {
    client: Client,
}

impl HttpProbeRevalidator {
    pub fn new() -> Result<Self, RevalidationError> {
        Ok(Self {
            client: Client::builder().timeout(PROBE_TIMEOUT).build()?,
        })
    }
}

#[async_trait]
impl Revalidator for HttpProbeRevalidator {
    async fn revalidate(
        &self,
        name: &str,
        fallback_address: &str,
        _previous: Option<&CachedResource>,
    ) -> Result<String, RevalidationError> {
        let response = self.client.get(fallback_address).send().await?;
        let status = response.status();
        debug!("Probe for {name} at {fallback_address} returned {status}");

        if status.is_server_error() {
            return Err(RevalidationError::Unhealthy {
                status: status.as_u16(),
            });
        }

        Ok(fallback_address.to_string())
    }
}
