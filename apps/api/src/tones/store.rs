use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::tone::ToneRow;
use crate::prompting::tone::{ToneDefinition, ToneLookup, ToneScope};
use crate::tones::CUSTOM_TONE_SORT_ORDER;

const LIST_FOR_SUBJECT_SQL: &str = r#"
    SELECT t.* FROM tones t
    LEFT JOIN users u ON u.id = t.user_id
    WHERE t.is_active AND (t.is_preset OR u.external_id = $1)
    ORDER BY t.sort_order, t.name
"#;

/// Fields of a custom tone being created or updated, already validated.
pub struct NewTone<'a> {
    pub name: &'a str,
    pub display_name: &'a str,
    pub description: Option<&'a str>,
    pub instructions: Option<&'a str>,
}

/// Postgres-backed tone table. Serves both the resolver and the tone CRUD handlers.
#[derive(Clone)]
pub struct PgToneStore {
    pool: PgPool,
}

impl PgToneStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_presets(&self) -> Result<Vec<ToneRow>, AppError> {
        let rows = sqlx::query_as::<_, ToneRow>(
            "SELECT * FROM tones WHERE is_active AND is_preset ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active presets plus the active custom tones owned by the auth-provider subject.
    /// Unknown subjects see presets only; no user row is created.
    pub async fn list_for_subject(&self, external_id: &str) -> Result<Vec<ToneRow>, AppError> {
        let rows = sqlx::query_as::<_, ToneRow>(LIST_FOR_SUBJECT_SQL)
            .bind(external_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// True if a preset or one of the user's own tones, other than `except`, already uses `name`.
    pub async fn name_taken(
        &self,
        name: &str,
        user_id: Uuid,
        except: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM tones
                WHERE name = $1
                  AND (is_preset OR user_id = $2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(name)
        .bind(user_id)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn create_custom(&self, user_id: Uuid, tone: NewTone<'_>) -> Result<ToneRow, AppError> {
        let row = sqlx::query_as::<_, ToneRow>(
            r#"
            INSERT INTO tones
                (name, display_name, description, instructions, is_preset, is_active, sort_order, user_id)
            VALUES ($1, $2, $3, $4, FALSE, TRUE, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tone.name)
        .bind(tone.display_name)
        .bind(tone.description)
        .bind(tone.instructions)
        .bind(CUSTOM_TONE_SORT_ORDER)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_custom(&self, id: Uuid, tone: NewTone<'_>) -> Result<ToneRow, AppError> {
        let row = sqlx::query_as::<_, ToneRow>(
            r#"
            UPDATE tones
            SET name = $2, display_name = $3, description = $4, instructions = $5
            WHERE id = $1 AND NOT is_preset
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tone.name)
        .bind(tone.display_name)
        .bind(tone.description)
        .bind(tone.instructions)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ToneRow>, AppError> {
        let row = sqlx::query_as::<_, ToneRow>("SELECT * FROM tones WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn into_definition(row: ToneRow, scope: ToneScope) -> ToneDefinition {
    ToneDefinition {
        name: row.name,
        instructions: row.instructions,
        description: row.description,
        scope,
        is_active: row.is_active,
    }
}

#[async_trait]
impl ToneLookup for PgToneStore {
    async fn find_preset(&self, name: &str) -> Result<Option<ToneDefinition>, AppError> {
        let row = sqlx::query_as::<_, ToneRow>(
            "SELECT * FROM tones WHERE name = $1 AND is_preset LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| into_definition(r, ToneScope::Preset)))
    }

    async fn find_custom(
        &self,
        name: &str,
        principal: &str,
    ) -> Result<Option<ToneDefinition>, AppError> {
        let row = sqlx::query_as::<_, ToneRow>(
            r#"
            SELECT t.* FROM tones t
            JOIN users u ON u.id = t.user_id
            WHERE t.name = $1 AND NOT t.is_preset AND u.external_id = $2
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(principal)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| {
            into_definition(
                r,
                ToneScope::Custom {
                    owner: principal.to_string(),
                },
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_listing_is_read_only_join() {
        let sql = LIST_FOR_SUBJECT_SQL.to_lowercase();
        assert!(sql.trim_start().starts_with("select"));
        assert!(!sql.contains("insert"));
        assert!(sql.contains("left join users u on u.id = t.user_id"));
        assert!(sql.contains("u.external_id = $1"));
    }
}
