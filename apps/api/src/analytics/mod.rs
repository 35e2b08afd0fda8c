//! Privacy-first reply analytics: platform key, tone label and timestamp only.

pub mod handlers;
pub mod stats;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics::stats::{ReplyTotals, StatsWindows, TOP_SERVICES_LIMIT};
use crate::models::reply::ReplyEventRow;

pub const TOTAL_REPLIES_CACHE_KEY: &str = "total_replies_count";

pub async fn record_reply(
    pool: &PgPool,
    user_id: Option<Uuid>,
    service_type: &str,
    tone_type: Option<&str>,
) -> Result<ReplyEventRow, sqlx::Error> {
    sqlx::query_as::<_, ReplyEventRow>(
        r#"
        INSERT INTO replies (user_id, service_type, tone_type)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(service_type)
    .bind(tone_type)
    .fetch_one(pool)
    .await
}

pub async fn count_replies(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM replies")
        .fetch_one(pool)
        .await
}

/// Totals per counting window for one auth-provider subject.
pub async fn reply_totals(
    pool: &PgPool,
    external_id: &str,
    windows: &StatsWindows,
) -> Result<ReplyTotals, sqlx::Error> {
    sqlx::query_as::<_, ReplyTotals>(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE r.created_at >= $2) AS today,
               COUNT(*) FILTER (WHERE r.created_at >= $3) AS week,
               COUNT(*) FILTER (WHERE r.created_at >= $4) AS month
        FROM replies r
        JOIN users u ON u.id = r.user_id
        WHERE u.external_id = $1
        "#,
    )
    .bind(external_id)
    .bind(windows.today_start)
    .bind(windows.week_start)
    .bind(windows.month_start)
    .fetch_one(pool)
    .await
}

/// Reply counts per UTC day since the start of the activity window.
pub async fn replies_per_day(
    pool: &PgPool,
    external_id: &str,
    windows: &StatsWindows,
) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (NaiveDate, i64)>(
        r#"
        SELECT (r.created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)
        FROM replies r
        JOIN users u ON u.id = r.user_id
        WHERE u.external_id = $1 AND r.created_at >= $2
        GROUP BY day
        "#,
    )
    .bind(external_id)
    .bind(windows.activity_start)
    .fetch_all(pool)
    .await
}

/// Most used services, busiest first.
pub async fn replies_per_service(
    pool: &PgPool,
    external_id: &str,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT r.service_type, COUNT(*) AS count
        FROM replies r
        JOIN users u ON u.id = r.user_id
        WHERE u.external_id = $1
        GROUP BY r.service_type
        ORDER BY count DESC, r.service_type
        LIMIT $2
        "#,
    )
    .bind(external_id)
    .bind(TOP_SERVICES_LIMIT)
    .fetch_all(pool)
    .await
}

pub async fn count_user_replies(pool: &PgPool, external_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM replies r
        JOIN users u ON u.id = r.user_id
        WHERE u.external_id = $1
        "#,
    )
    .bind(external_id)
    .fetch_one(pool)
    .await
}

pub async fn recent_replies(
    pool: &PgPool,
    external_id: &str,
    limit: i64,
) -> Result<Vec<ReplyEventRow>, sqlx::Error> {
    sqlx::query_as::<_, ReplyEventRow>(
        r#"
        SELECT r.* FROM replies r
        JOIN users u ON u.id = r.user_id
        WHERE u.external_id = $1
        ORDER BY r.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(external_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Deletes one of the subject's own reply events. Returns false if no such event is theirs.
pub async fn delete_reply(
    pool: &PgPool,
    reply_id: Uuid,
    external_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM replies r
        USING users u
        WHERE r.id = $1 AND r.user_id = u.id AND u.external_id = $2
        "#,
    )
    .bind(reply_id)
    .bind(external_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
