//! Builders for reminders used across unit tests.

use chrono::Duration;
use clienter_core::types::{DbId, Timestamp};
use clienter_db::models::reminder::{ClientRef, MeetingRef, ReminderWithMeeting};
use uuid::Uuid;

pub struct ReminderBuilder {
    reminder: ReminderWithMeeting,
}

/// A reminder due at `remind_at` for a meeting 15 minutes later.
pub fn reminder_due(remind_at: Timestamp) -> ReminderBuilder {
    let meeting_id = Uuid::new_v4();
    ReminderBuilder {
        reminder: ReminderWithMeeting {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            meeting_id,
            remind_at,
            is_dismissed: false,
            dismissed_at: None,
            meeting: MeetingRef {
                id: meeting_id,
                title: "Meeting".into(),
                description: None,
                meeting_time: remind_at + Duration::minutes(15),
                duration_minutes: 60,
                meeting_link: None,
                client: None,
            },
        },
    }
}

impl ReminderBuilder {
    pub fn user(mut self, user_id: DbId) -> Self {
        self.reminder.user_id = user_id;
        self
    }

    pub fn with_meeting(mut self, title: &str, meeting_time: Timestamp) -> Self {
        self.reminder.meeting.title = title.into();
        self.reminder.meeting.meeting_time = meeting_time;
        self
    }

    pub fn with_client(mut self, name: &str) -> Self {
        self.reminder.meeting.client = Some(ClientRef {
            id: Uuid::new_v4(),
            name: name.into(),
        });
        self
    }

    pub fn dismissed(mut self) -> Self {
        self.reminder.is_dismissed = true;
        self
    }

    pub fn build(self) -> ReminderWithMeeting {
        self.reminder
    }
}
