use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analytics::stats::{daily_activity, top_services, DashboardStats, StatsWindows};
use crate::analytics::{
    count_replies, count_user_replies, delete_reply, recent_replies, record_reply,
    replies_per_day, replies_per_service, reply_totals, TOTAL_REPLIES_CACHE_KEY,
};
use crate::db::ensure_user;
use crate::errors::AppError;
use crate::models::reply::ReplyEventRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogReplyRequest {
    pub user_id: Option<String>,
    pub service_type: String,
    pub tone_type: Option<String>,
}

const DEFAULT_RECENT_LIMIT: i64 = 10;
const MAX_RECENT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub user_id: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentActivityResponse {
    pub replies: Vec<ReplyEventRow>,
    pub total_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyCountResponse {
    pub success: bool,
    pub total_replies: i64,
    pub cached: bool,
}

/// POST /api/v1/replies
///
/// Records that a reply was generated. No post or reply content is accepted.
pub async fn handle_log_reply(
    State(state): State<AppState>,
    Json(request): Json<LogReplyRequest>,
) -> Result<(StatusCode, Json<ReplyEventRow>), AppError> {
    let service_type = request.service_type.trim().to_lowercase();
    if service_type.is_empty() {
        return Err(AppError::Validation(
            "service_type cannot be empty".to_string(),
        ));
    }

    let user_id = match request.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(external_id) => Some(ensure_user(&state.db, external_id).await?),
        None => None,
    };

    let event = record_reply(
        &state.db,
        user_id,
        &service_type,
        request.tone_type.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/replies/count
pub async fn handle_reply_count(
    State(state): State<AppState>,
) -> Result<Json<ReplyCountResponse>, AppError> {
    let (total_replies, cached) = state
        .cache
        .cached(
            TOTAL_REPLIES_CACHE_KEY,
            state.config.reply_count_cache_ttl_secs,
            || count_replies(&state.db),
        )
        .await?;

    Ok(Json(ReplyCountResponse {
        success: true,
        total_replies,
        cached,
    }))
}

/// GET /api/v1/replies/stats
///
/// Dashboard counters for one user. Windows are anchored at UTC midnight.
pub async fn handle_reply_stats(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let windows = StatsWindows::at(Utc::now())?;

    let totals = reply_totals(&state.db, &params.user_id, &windows).await?;
    let per_day = replies_per_day(&state.db, &params.user_id, &windows).await?;
    let per_service = replies_per_service(&state.db, &params.user_id).await?;

    Ok(Json(DashboardStats {
        total_replies: totals.total,
        today_replies: totals.today,
        week_replies: totals.week,
        month_replies: totals.month,
        daily_activity: daily_activity(windows.today(), &per_day),
        top_services: top_services(per_service, totals.total),
    }))
}

/// GET /api/v1/replies/recent
pub async fn handle_recent_replies(
    State(state): State<AppState>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<RecentActivityResponse>, AppError> {
    let limit = recent_limit(params.limit)?;

    let replies = recent_replies(&state.db, &params.user_id, limit).await?;
    let total_count = count_user_replies(&state.db, &params.user_id).await?;

    Ok(Json(RecentActivityResponse {
        replies,
        total_count,
    }))
}

/// DELETE /api/v1/replies/:id
///
/// Events that exist but belong to someone else are reported as not found.
pub async fn handle_delete_reply(
    State(state): State<AppState>,
    Path(reply_id): Path<Uuid>,
    Query(params): Query<UserQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    if !delete_reply(&state.db, reply_id, &params.user_id).await? {
        return Err(AppError::NotFound(
            "Reply analytics record not found".to_string(),
        ));
    }

    info!("Deleted reply event {reply_id}");
    Ok(Json(MessageResponse {
        message: "Reply analytics record deleted successfully".to_string(),
    }))
}

fn recent_limit(requested: Option<i64>) -> Result<i64, AppError> {
    let limit = requested.unwrap_or(DEFAULT_RECENT_LIMIT);
    if !(1..=MAX_RECENT_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_RECENT_LIMIT}"
        )));
    }
    Ok(limit)
}
