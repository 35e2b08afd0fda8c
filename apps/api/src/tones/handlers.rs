//! Axum route handlers for the Tones API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::ensure_user;
use crate::errors::AppError;
use crate::models::tone::ToneRow;
use crate::state::AppState;
use crate::tones::store::NewTone;
use crate::tones::{validate_tone_fields, validate_tone_name};

#[derive(Debug, Deserialize)]
pub struct OptionalUserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct TonesListResponse {
    pub tones: Vec<ToneRow>,
}

/// Body of both create and update.
#[derive(Debug, Deserialize)]
pub struct CreateToneRequest {
    pub user_id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

/// GET /api/v1/tones
///
/// Active presets, plus the caller's custom tones when `user_id` is supplied.
pub async fn handle_list_tones(
    State(state): State<AppState>,
    Query(params): Query<OptionalUserQuery>,
) -> Result<Json<TonesListResponse>, AppError> {
    let tones = match params.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(external_id) => state.tones.list_for_subject(external_id).await?,
        None => state.tones.list_presets().await?,
    };

    Ok(Json(TonesListResponse { tones }))
}

/// GET /api/v1/tones/presets
pub async fn handle_list_presets(
    State(state): State<AppState>,
) -> Result<Json<TonesListResponse>, AppError> {
    let tones = state.tones.list_presets().await?;
    Ok(Json(TonesListResponse { tones }))
}

/// POST /api/v1/tones
pub async fn handle_create_tone(
    State(state): State<AppState>,
    Json(request): Json<CreateToneRequest>,
) -> Result<(StatusCode, Json<ToneRow>), AppError> {
    let name = request.name.trim();
    validate_tone_name(name)?;
    validate_tone_fields(
        &request.display_name,
        request.description.as_deref(),
        request.instructions.as_deref(),
    )?;

    let user_id = ensure_user(&state.db, &request.user_id).await?;

    if state.tones.name_taken(name, user_id, None).await? {
        return Err(AppError::Validation(
            "A tone with this name already exists".to_string(),
        ));
    }

    let tone = state
        .tones
        .create_custom(
            user_id,
            NewTone {
                name,
                display_name: request.display_name.trim(),
                description: request.description.as_deref(),
                instructions: request.instructions.as_deref(),
            },
        )
        .await?;

    info!("Created custom tone '{}' for user {user_id}", tone.name);
    Ok((StatusCode::CREATED, Json(tone)))
}

/// PUT /api/v1/tones/:id
///
/// Same validation as create. Renaming may not collide with a preset or another own tone.
pub async fn handle_update_tone(
    State(state): State<AppState>,
    Path(tone_id): Path<Uuid>,
    Json(request): Json<CreateToneRequest>,
) -> Result<Json<ToneRow>, AppError> {
    let name = request.name.trim();
    validate_tone_name(name)?;
    validate_tone_fields(
        &request.display_name,
        request.description.as_deref(),
        request.instructions.as_deref(),
    )?;

    let user_id = ensure_user(&state.db, &request.user_id).await?;

    let tone = state
        .tones
        .find_by_id(tone_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tone not found".to_string()))?;
    ensure_owner(&tone, user_id, "update")?;

    if name != tone.name && state.tones.name_taken(name, user_id, Some(tone_id)).await? {
        return Err(AppError::Validation(
            "A tone with this name already exists".to_string(),
        ));
    }

    let updated = state
        .tones
        .update_custom(
            tone_id,
            NewTone {
                name,
                display_name: request.display_name.trim(),
                description: request.description.as_deref(),
                instructions: request.instructions.as_deref(),
            },
        )
        .await?;

    info!("Updated custom tone '{}' for user {user_id}", updated.name);
    Ok(Json(updated))
}

/// DELETE /api/v1/tones/:id
///
/// Only the owner may delete a custom tone; presets are never deletable here.
pub async fn handle_delete_tone(
    State(state): State<AppState>,
    Path(tone_id): Path<Uuid>,
    Query(params): Query<UserQuery>,
) -> Result<StatusCode, AppError> {
    let user_id = ensure_user(&state.db, &params.user_id).await?;

    let tone = state
        .tones
        .find_by_id(tone_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tone not found".to_string()))?;
    ensure_owner(&tone, user_id, "delete")?;

    state.tones.delete(tone_id).await?;
    info!("Deleted custom tone '{}' for user {user_id}", tone.name);

    Ok(StatusCode::NO_CONTENT)
}

/// Presets and other users' tones are off limits.
fn ensure_owner(tone: &ToneRow, user_id: Uuid, action: &str) -> Result<(), AppError> {
    if tone.is_preset || tone.user_id != Some(user_id) {
        return Err(AppError::Forbidden(format!(
            "You can only {action} your own custom tones"
        )));
    }
    Ok(())
}
