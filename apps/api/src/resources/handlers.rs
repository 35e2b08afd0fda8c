//! Axum route handlers for the external service URL cache.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::resource::CachedResource;
use crate::state::AppState;

/// Resource name of the third-party text generator.
pub const GENERATOR_SERVICE: &str = "pollinations";

#[derive(Debug, Serialize)]
pub struct ServiceUrlsResponse {
    pub pollinations_url: String,
    pub cache_expires_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ServiceUrlResponse {
    pub service_name: String,
    pub url: String,
    pub is_active: bool,
    pub last_checked: DateTime<Utc>,
    pub cache_expires_at: Option<DateTime<Utc>>,
}

impl From<CachedResource> for ServiceUrlResponse {
    fn from(resource: CachedResource) -> Self {
        Self {
            service_name: resource.name,
            url: resource.address,
            is_active: resource.is_active,
            last_checked: resource.last_checked_at,
            cache_expires_at: resource.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub url: String,
    pub last_checked: DateTime<Utc>,
}

/// Resolves a registered service, failing with 404 for names the registry does not know.
pub async fn resolve_registered(state: &AppState, name: &str) -> Result<CachedResource, AppError> {
    let fallback = state
        .config
        .services
        .fallback_for(name)
        .ok_or_else(|| AppError::NotFound(format!("Service '{name}' not supported")))?;

    state.resources.resolve(name, fallback).await
}

/// GET /api/v1/services/urls
pub async fn handle_get_service_urls(
    State(state): State<AppState>,
) -> Result<Json<ServiceUrlsResponse>, AppError> {
    let generator = resolve_registered(&state, GENERATOR_SERVICE).await?;

    Ok(Json(ServiceUrlsResponse {
        pollinations_url: generator.address,
        cache_expires_at: generator.expires_at,
        last_updated: generator.last_checked_at,
    }))
}

/// GET /api/v1/services/urls/:name
pub async fn handle_get_service_url(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceUrlResponse>, AppError> {
    let resource = resolve_registered(&state, &name.to_lowercase()).await?;
    Ok(Json(resource.into()))
}

/// POST /api/v1/services/urls/:name/refresh
///
/// Admin cache-bust. Names missing from the registry refresh against their stored address.
pub async fn handle_refresh_service_url(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RefreshResponse>, AppError> {
    let name = name.to_lowercase();
    let fallback = state.config.services.fallback_for(&name);

    let resource = state.resources.refresh(&name, fallback).await?;

    Ok(Json(RefreshResponse {
        message: format!("Service URL for '{name}' refreshed successfully"),
        url: resource.address,
        last_checked: resource.last_checked_at,
    }))
}
