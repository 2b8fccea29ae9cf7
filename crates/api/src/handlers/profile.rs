//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::Json;
use clienter_core::error::CoreError;
use clienter_core::meeting::MAX_REMINDER_MINUTES;
use clienter_db::models::profile::{Profile, UpdateProfile};
use clienter_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate(input: &UpdateProfile) -> Result<(), CoreError> {
    if let Some(minutes) = input.default_reminder_minutes {
        if !(0..=MAX_REMINDER_MINUTES).contains(&minutes) {
            return Err(CoreError::Validation(format!(
                "default_reminder_minutes must be between 0 and {MAX_REMINDER_MINUTES}"
            )));
        }
    }
    for (field, value) in [("timezone", &input.timezone), ("currency", &input.currency)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(CoreError::Validation(format!("{field} must not be empty")));
        }
    }
    Ok(())
}

/// GET /api/v1/profile
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::get_or_create(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// PUT /api/v1/profile
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    validate(&input)?;
    let profile = ProfileRepo::update(&state.pool, user.user_id, &input).await?;
    Ok(Json(DataResponse::new(profile)))
}
