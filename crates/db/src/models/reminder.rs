//! Reminder entity models.

use clienter_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reminders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reminder {
    pub id: DbId,
    pub user_id: DbId,
    pub meeting_id: DbId,
    pub remind_at: Timestamp,
    pub is_dismissed: bool,
    pub dismissed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// The client a reminder's meeting belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRef {
    pub id: DbId,
    pub name: String,
}

/// The meeting payload joined onto a reminder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingRef {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub meeting_time: Timestamp,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub client: Option<ClientRef>,
}

/// A reminder with its meeting (and the meeting's client) attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderWithMeeting {
    pub id: DbId,
    pub user_id: DbId,
    pub meeting_id: DbId,
    pub remind_at: Timestamp,
    pub is_dismissed: bool,
    pub dismissed_at: Option<Timestamp>,
    pub meeting: MeetingRef,
}

/// Flat join row; see `ReminderRepo` for the matching column list.
#[derive(Debug, FromRow)]
pub(crate) struct ReminderJoinRow {
    pub id: DbId,
    pub user_id: DbId,
    pub meeting_id: DbId,
    pub remind_at: Timestamp,
    pub is_dismissed: bool,
    pub dismissed_at: Option<Timestamp>,
    pub meeting_title: String,
    pub meeting_description: Option<String>,
    pub meeting_time: Timestamp,
    pub duration_minutes: i32,
    pub meeting_link: Option<String>,
    pub client_id: Option<DbId>,
    pub client_name: Option<String>,
}

impl From<ReminderJoinRow> for ReminderWithMeeting {
    fn from(row: ReminderJoinRow) -> Self {
        let client = match (row.client_id, row.client_name) {
            (Some(id), Some(name)) => Some(ClientRef { id, name }),
            _ => None,
        };
        ReminderWithMeeting {
            id: row.id,
            user_id: row.user_id,
            meeting_id: row.meeting_id,
            remind_at: row.remind_at,
            is_dismissed: row.is_dismissed,
            dismissed_at: row.dismissed_at,
            meeting: MeetingRef {
                id: row.meeting_id,
                title: row.meeting_title,
                description: row.meeting_description,
                meeting_time: row.meeting_time,
                duration_minutes: row.duration_minutes,
                meeting_link: row.meeting_link,
                client,
            },
        }
    }
}
