//! Handlers for the notification center.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use clienter_core::error::CoreError;
use clienter_core::types::DbId;
use clienter_db::models::reminder::ReminderWithMeeting;
use clienter_db::repositories::ReminderRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many pending reminders the notification center shows.
const LIST_LIMIT: i64 = 20;

/// GET /api/v1/reminders
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ReminderWithMeeting>>>> {
    let reminders =
        ReminderRepo::list_pending(&state.pool, user.user_id, None, Some(LIST_LIMIT)).await?;
    Ok(Json(DataResponse::new(reminders)))
}

/// POST /api/v1/reminders/{id}/dismiss
///
/// Every open reminder stream of the user drops the reminder right away, so
/// it can neither alert nor stay on screen until the next fetch.
pub async fn dismiss(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ReminderRepo::dismiss(&state.pool, user.user_id, id, Utc::now()).await? {
        tracing::info!(user_id = %user.user_id, reminder_id = %id, "Reminder dismissed");
        state.ws_manager.forget_reminder(user.user_id, id).await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Reminder",
            id,
        }))
    }
}
