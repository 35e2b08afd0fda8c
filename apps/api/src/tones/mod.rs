//! Tone presets and per-user custom tones.
//!
//! Custom tone names share the preset namespace: creating a custom tone whose
//! name matches a preset (or one of the user's own tones) is rejected.

pub mod handlers;
pub mod store;

use crate::errors::AppError;

const MAX_NAME_LEN: usize = 50;
const MAX_DISPLAY_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Sort order given to custom tones so they list after presets.
pub const CUSTOM_TONE_SORT_ORDER: i32 = 1000;

/// Tone names are lowercase ASCII letters, digits and underscores.
pub fn validate_tone_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Tone name must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(AppError::Validation(
            "Tone name must be lowercase and contain only letters, numbers, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

pub fn validate_tone_fields(
    display_name: &str,
    description: Option<&str>,
    instructions: Option<&str>,
) -> Result<(), AppError> {
    let display_len = display_name.trim().chars().count();
    if display_len == 0 || display_len > MAX_DISPLAY_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Display name must be between 1 and {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }

    for (field, value) in [("Description", description), ("Instructions", instructions)] {
        if value.is_some_and(|v| v.chars().count() > MAX_DESCRIPTION_LEN) {
            return Err(AppError::Validation(format!(
                "{field} must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
    }

    Ok(())
}
