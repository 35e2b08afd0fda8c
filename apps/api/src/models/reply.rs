use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Minimal analytics record. Never carries post or reply content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReplyEventRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub service_type: String,
    pub tone_type: Option<String>,
    pub created_at: DateTime<Utc>,
}
