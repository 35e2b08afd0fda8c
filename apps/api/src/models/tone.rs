use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ToneRow {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub is_preset: bool,
    pub is_active: bool,
    pub sort_order: i32,
    /// NULL for presets, owner for custom tones.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
