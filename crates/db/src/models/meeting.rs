//! Meeting entity model and DTOs.

use clienter_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `meetings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Meeting {
    pub id: DbId,
    pub user_id: DbId,
    pub client_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: Timestamp,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub reminder_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A meeting joined with the name of its client, if any.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeetingWithClient {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meeting: Meeting,
    pub client_name: Option<String>,
}

/// Fully resolved insert for a meeting.
///
/// Built from a validated [`MeetingDraft`](clienter_core::meeting::MeetingDraft)
/// once defaults (duration, lead time) have been applied.
#[derive(Debug, Clone)]
pub struct CreateMeeting {
    pub client_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: Timestamp,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub reminder_minutes: i32,
}
