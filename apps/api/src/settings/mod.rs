//! Per-user writing style and guardian ("do not") text.

pub mod handlers;

use sqlx::PgPool;

use crate::models::settings::UserSettingsRow;

/// Loads settings for an auth-provider subject. `None` if the user or row does not exist.
pub async fn load_settings(
    pool: &PgPool,
    external_id: &str,
) -> Result<Option<UserSettingsRow>, sqlx::Error> {
    sqlx::query_as::<_, UserSettingsRow>(
        r#"
        SELECT s.* FROM user_settings s
        JOIN users u ON u.id = s.user_id
        WHERE u.external_id = $1
        "#,
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await
}

/// Replaces both fields; `None` clears a field.
pub async fn upsert_settings(
    pool: &PgPool,
    user_id: uuid::Uuid,
    writing_style: Option<&str>,
    guardian_text: Option<&str>,
) -> Result<UserSettingsRow, sqlx::Error> {
    sqlx::query_as::<_, UserSettingsRow>(
        r#"
        INSERT INTO user_settings (user_id, writing_style, guardian_text)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE SET
            writing_style = EXCLUDED.writing_style,
            guardian_text = EXCLUDED.guardian_text,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(writing_style)
    .bind(guardian_text)
    .fetch_one(pool)
    .await
}

/// Removes the subject's saved settings so defaults apply again. Missing rows are fine.
pub async fn delete_settings(pool: &PgPool, external_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM user_settings s
        USING users u
        WHERE s.user_id = u.id AND u.external_id = $1
        "#,
    )
    .bind(external_id)
    .execute(pool)
    .await?;
    Ok(())
}
