use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One external dependency's last known-good location.
///
/// `expires_at` of `None` (or a past instant) means the record is stale and
/// must be revalidated before it is handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CachedResource {
    pub name: String,
    pub address: String,
    pub is_active: bool,
    pub last_checked_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedResource {
    /// True while `expires_at` is strictly in the future of `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at > now)
    }
}
