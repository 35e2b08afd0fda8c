use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::ensure_user;
use crate::errors::AppError;
use crate::settings::{delete_settings, load_settings, upsert_settings};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub user_id: String,
    pub writing_style: Option<String>,
    pub guardian_text: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SettingsResponse {
    pub writing_style: Option<String>,
    pub guardian_text: Option<String>,
}

/// Blank strings are stored as NULL.
fn normalize(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// GET /api/v1/user-settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<SettingsResponse>, AppError> {
    let response = load_settings(&state.db, &params.user_id)
        .await?
        .map(|s| SettingsResponse {
            writing_style: s.writing_style,
            guardian_text: s.guardian_text,
        })
        .unwrap_or_default();

    Ok(Json(response))
}

/// PUT /api/v1/user-settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let user_id = ensure_user(&state.db, &request.user_id).await?;

    let saved = upsert_settings(
        &state.db,
        user_id,
        normalize(request.writing_style.as_deref()),
        normalize(request.guardian_text.as_deref()),
    )
    .await?;

    Ok(Json(SettingsResponse {
        writing_style: saved.writing_style,
        guardian_text: saved.guardian_text,
    }))
}

/// DELETE /api/v1/user-settings
///
/// Resets to defaults. Succeeds whether or not settings were saved.
pub async fn handle_delete_settings(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<StatusCode, AppError> {
    delete_settings(&state.db, &params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_blank_to_none() {
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some(" casual ")), Some("casual"));
    }
}
