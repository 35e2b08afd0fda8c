//! External resource cache. Answers "where is service X, and is it healthy?".
//!
//! Records are revalidated lazily: the first read after `expires_at` passes runs the
//! configured `Revalidator` and persists the result. There is no background timer and
//! no cross-caller exclusion; two callers racing on the same stale record both
//! revalidate and both write an equivalent record.

pub mod handlers;
pub mod registry;
pub mod revalidate;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resource::CachedResource;
use crate::resources::revalidate::Revalidator;

/// How far into the past `force_expire` pushes `expires_at`.
const FORCE_EXPIRE_BACKDATE_MINUTES: i64 = 1;

/// Persistence seam for resource records. Carried by `ResourceCache` as `Arc<dyn ResourceStore>`.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn find(&self, name: &str) -> Result<Option<CachedResource>, AppError>;

    /// Inserts the record, or overwrites the existing record with the same name.
    async fn save(&self, resource: &CachedResource) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct ResourceCache {
    store: Arc<dyn ResourceStore>,
    revalidator: Arc<dyn Revalidator>,
    ttl: Duration,
}

impl ResourceCache {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        revalidator: Arc<dyn Revalidator>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            revalidator,
            ttl,
        }
    }

    /// Returns the record for `name`, revalidating it first if it is missing or stale.
    pub async fn resolve(
        &self,
        name: &str,
        fallback_address: &str,
    ) -> Result<CachedResource, AppError> {
        self.resolve_at(name, fallback_address, Utc::now()).await
    }

    /// Backdates `expires_at` so the next `resolve` revalidates. Address and health are untouched.
    pub async fn force_expire(&self, name: &str) -> Result<CachedResource, AppError> {
        self.force_expire_at(name, Utc::now()).await
    }

    /// Administrative cache-bust: expire, then resolve again. Without a fallback the
    /// record is revalidated against its own stored address.
    pub async fn refresh(
        &self,
        name: &str,
        fallback_address: Option<&str>,
    ) -> Result<CachedResource, AppError> {
        let expired = self.force_expire(name).await?;
        let fallback = fallback_address.unwrap_or(&expired.address);
        self.resolve(name, fallback).await
    }

    async fn resolve_at(
        &self,
        name: &str,
        fallback_address: &str,
        now: DateTime<Utc>,
    ) -> Result<CachedResource, AppError> {
        let existing = self.store.find(name).await?;

        if let Some(resource) = existing.as_ref().filter(|r| r.is_fresh(now)) {
            return Ok(resource.clone());
        }

        let revalidated = self
            .revalidate(name, fallback_address, existing.as_ref(), now)
            .await;
        self.store.save(&revalidated).await?;

        Ok(revalidated)
    }

    async fn force_expire_at(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<CachedResource, AppError> {
        let mut resource = self
            .store
            .find(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service '{name}' not found")))?;

        resource.expires_at = Some(now - Duration::minutes(FORCE_EXPIRE_BACKDATE_MINUTES));
        self.store.save(&resource).await?;

        info!("Forced expiry of cached {name} URL");
        Ok(resource)
    }

    /// Builds the post-revalidation record. A failed check keeps the last known-good
    /// address (or the fallback if there is none) and marks the record inactive.
    async fn revalidate(
        &self,
        name: &str,
        fallback_address: &str,
        previous: Option<&CachedResource>,
        now: DateTime<Utc>,
    ) -> CachedResource {
        let (address, is_active) = match self
            .revalidator
            .revalidate(name, fallback_address, previous)
            .await
        {
            Ok(address) => {
                info!("Updated {name} URL: {address}");
                (address, true)
            }
            Err(e) => {
                warn!("Revalidation of {name} failed, marking inactive: {e}");
                let address = previous
                    .map(|p| p.address.clone())
                    .unwrap_or_else(|| fallback_address.to_string());
                (address, false)
            }
        };

        let expires_at = now.checked_add_signed(self.ttl).unwrap_or_else(|| {
            warn!("TTL for {name} overflows the calendar, capping expiry");
            DateTime::<Utc>::MAX_UTC
        });

        CachedResource {
            name: name.to_string(),
            address,
            is_active,
            last_checked_at: now,
            expires_at: Some(expires_at),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres-backed store
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn find(&self, name: &str) -> Result<Option<CachedResource>, AppError> {
        let resource = sqlx::query_as::<_, CachedResource>(
            r#"
            SELECT service_name AS name, url AS address, is_active,
                   last_checked AS last_checked_at, cache_expires_at AS expires_at
            FROM external_service_urls
            WHERE service_name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(resource)
    }

    async fn save(&self, resource: &CachedResource) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO external_service_urls
                (service_name, url, is_active, last_checked, cache_expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (service_name) DO UPDATE SET
                url = EXCLUDED.url,
                is_active = EXCLUDED.is_active,
                last_checked = EXCLUDED.last_checked,
                cache_expires_at = EXCLUDED.cache_expires_at,
                updated_at = now()
            "#,
        )
        .bind(&resource.name)
        .bind(&resource.address)
        .bind(resource.is_active)
        .bind(resource.last_checked_at)
        .bind(resource.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
