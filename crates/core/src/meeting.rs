//! Meeting input validation and reminder derivation.

use chrono::Duration;
use serde::Deserialize;
use validator::Validate;

use crate::types::{DbId, Timestamp};

/// Duration used when the caller does not supply one.
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Lead time used when neither the meeting nor the profile supplies one.
pub const DEFAULT_REMINDER_MINUTES: i32 = 15;

/// Longest allowed meeting (one day).
pub const MAX_DURATION_MINUTES: i32 = 1440;

/// Longest allowed lead time (one week).
pub const MAX_REMINDER_MINUTES: i32 = 10080;

/// Request body for scheduling a meeting.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MeetingDraft {
    pub client_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub meeting_time: Timestamp,
    #[validate(range(min = 1, max = MAX_DURATION_MINUTES))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    #[validate(range(min = 0, max = MAX_REMINDER_MINUTES))]
    pub reminder_minutes: Option<i32>,
}

impl MeetingDraft {
    /// Trim text fields and turn blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: non_blank(self.description),
            meeting_link: non_blank(self.meeting_link),
            ..self
        }
    }
}

/// Request body for editing a meeting. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MeetingPatch {
    pub client_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub meeting_time: Option<Timestamp>,
    #[validate(range(min = 1, max = MAX_DURATION_MINUTES))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    #[validate(range(min = 0, max = MAX_REMINDER_MINUTES))]
    pub reminder_minutes: Option<i32>,
}

impl MeetingPatch {
    /// Trim text fields. Blank optional fields count as absent and leave the
    /// stored value unchanged.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            description: non_blank(self.description),
            meeting_link: non_blank(self.meeting_link),
            ..self
        }
    }

    /// Whether applying this patch moves the reminder's due time.
    pub fn reschedules_reminder(&self) -> bool {
        self.meeting_time.is_some() || self.reminder_minutes.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lead time for a new meeting: explicit value, else the profile default,
/// else [`DEFAULT_REMINDER_MINUTES`].
pub fn resolve_reminder_minutes(requested: Option<i32>, profile_default: Option<i32>) -> i32 {
    requested
        .or(profile_default)
        .unwrap_or(DEFAULT_REMINDER_MINUTES)
}

/// When the meeting's reminder is due.
pub fn remind_at(meeting_time: Timestamp, reminder_minutes: i32) -> Timestamp {
    meeting_time - Duration::minutes(i64::from(reminder_minutes))
}

/// Meetings strictly in the future are upcoming; everything else is past.
pub fn is_upcoming(meeting_time: Timestamp, now: Timestamp) -> bool {
    meeting_time > now
}
