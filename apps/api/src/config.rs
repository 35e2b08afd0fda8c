use anyhow::{ensure, Context, Result};

use crate::resources::registry::ServiceRegistry;

const DEFAULT_SERVICE_URLS: &str = "pollinations=https://text.pollinations.ai";

/// Upper bound for `SERVICE_CACHE_TTL_SECS` (30 days).
const MAX_SERVICE_CACHE_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub redis_enabled: bool,
    pub port: u16,
    pub rust_log: String,
    /// Resource name → fallback address used when revalidating cached service URLs.
    pub services: ServiceRegistry,
    pub service_cache_ttl_secs: i64,
    /// When set, revalidation probes the service over HTTP instead of trusting the fallback.
    pub service_health_probe: bool,
    pub reply_count_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let services = std::env::var("SERVICE_URLS")
            .unwrap_or_else(|_| DEFAULT_SERVICE_URLS.to_string())
            .parse::<ServiceRegistry>()
            .context("SERVICE_URLS must be a comma-separated list of name=url pairs")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string()),
            redis_enabled: parse_env("REDIS_ENABLED", true)?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            services,
            service_cache_ttl_secs: check_service_cache_ttl(parse_env(
                "SERVICE_CACHE_TTL_SECS",
                3600,
            )?)?,
            service_health_probe: parse_env("SERVICE_HEALTH_PROBE", false)?,
            reply_count_cache_ttl_secs: parse_env("REPLY_COUNT_CACHE_TTL_SECS", 300)?,
        })
    }
}

/// Cached service records must expire strictly after they are written.
fn check_service_cache_ttl(secs: i64) -> Result<i64> {
    ensure!(
        secs > 0,
        "SERVICE_CACHE_TTL_SECS must be positive, got {secs}"
    );
    ensure!(
        secs <= MAX_SERVICE_CACHE_TTL_SECS,
        "SERVICE_CACHE_TTL_SECS must be at most {MAX_SERVICE_CACHE_TTL_SECS}, got {secs}"
    );
    Ok(secs)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
