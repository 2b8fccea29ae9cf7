//! Handlers for the `/meetings` resource.
//!
//! Every meeting carries one reminder; creating or rescheduling a meeting
//! writes both in one transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use clienter_core::error::CoreError;
use clienter_core::meeting::{
    is_upcoming, resolve_reminder_minutes, MeetingDraft, MeetingPatch, DEFAULT_DURATION_MINUTES,
};
use clienter_core::types::DbId;
use clienter_db::models::meeting::{CreateMeeting, Meeting, MeetingWithClient};
use clienter_db::models::reminder::Reminder;
use clienter_db::repositories::{ClientRepo, MeetingRepo, ProfileRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A freshly scheduled meeting with its reminder.
#[derive(Debug, Serialize)]
pub struct ScheduledMeeting {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub reminder: Reminder,
}

/// Meetings split around the current time.
#[derive(Debug, Serialize)]
pub struct MeetingTimeline {
    /// Soonest first.
    pub upcoming: Vec<MeetingWithClient>,
    /// Most recent first.
    pub past: Vec<MeetingWithClient>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Meeting",
        id,
    })
}

/// A meeting may only be attached to one of the caller's own clients.
async fn ensure_client_owned(
    state: &AppState,
    user_id: DbId,
    client_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(client_id) = client_id {
        ClientRepo::find_by_id(&state.pool, user_id, client_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Client",
                id: client_id,
            }))?;
    }
    Ok(())
}

/// POST /api/v1/meetings
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<MeetingDraft>,
) -> AppResult<(StatusCode, Json<DataResponse<ScheduledMeeting>>)> {
    let draft = draft.normalized();
    draft.validate()?;
    ensure_client_owned(&state, user.user_id, draft.client_id).await?;

    let profile_default = ProfileRepo::default_reminder_minutes(&state.pool, user.user_id).await?;
    let input = CreateMeeting {
        client_id: draft.client_id,
        title: draft.title,
        description: draft.description,
        meeting_time: draft.meeting_time,
        duration_minutes: draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
        meeting_link: draft.meeting_link,
        reminder_minutes: resolve_reminder_minutes(draft.reminder_minutes, profile_default),
    };

    let (meeting, reminder) =
        MeetingRepo::create_with_reminder(&state.pool, user.user_id, &input).await?;
    tracing::info!(
        user_id = %user.user_id,
        meeting_id = %meeting.id,
        remind_at = %reminder.remind_at,
        "Meeting scheduled"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(ScheduledMeeting { meeting, reminder })),
    ))
}

/// GET /api/v1/meetings
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<MeetingTimeline>>> {
    let now = Utc::now();
    let (upcoming, mut past): (Vec<_>, Vec<_>) = MeetingRepo::list(&state.pool, user.user_id)
        .await?
        .into_iter()
        .partition(|m| is_upcoming(m.meeting.meeting_time, now));
    past.reverse();

    Ok(Json(DataResponse::new(MeetingTimeline { upcoming, past })))
}

/// GET /api/v1/meetings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MeetingWithClient>>> {
    let meeting = MeetingRepo::find_by_id(&state.pool, user.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(meeting)))
}

/// PUT /api/v1/meetings/{id}
///
/// Changing `meeting_time` or `reminder_minutes` moves the reminder and
/// re-arms it, even if it was dismissed.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(patch): Json<MeetingPatch>,
) -> AppResult<Json<DataResponse<Meeting>>> {
    let patch = patch.normalized();
    patch.validate()?;
    ensure_client_owned(&state, user.user_id, patch.client_id).await?;

    let meeting = MeetingRepo::update(&state.pool, user.user_id, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(meeting)))
}

/// DELETE /api/v1/meetings/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MeetingRepo::delete(&state.pool, user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
