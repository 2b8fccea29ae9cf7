//! Delivery seam for due reminders.

use std::time::Duration;

use chrono::TimeZone;
use clienter_core::format::relative_time_in;
use clienter_core::types::{DbId, Timestamp};
use clienter_db::models::reminder::ReminderWithMeeting;
use serde::Serialize;

/// What the user sees when a reminder fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderNotice {
    pub reminder_id: DbId,
    pub meeting_id: DbId,
    pub title: String,
    pub client_name: Option<String>,
    pub meeting_time: Timestamp,
    /// e.g. `Today at 3:30 PM`.
    pub relative_time: String,
    pub meeting_link: Option<String>,
    /// Minimum time the notice stays visible, in seconds.
    pub display_secs: u64,
}

impl ReminderNotice {
    /// Build the notice for `reminder`, phrasing the meeting time relative to
    /// `now` as seen in `tz`.
    pub fn new<Tz: TimeZone>(
        reminder: &ReminderWithMeeting,
        now: Timestamp,
        tz: &Tz,
        display: Duration,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let meeting = &reminder.meeting;
        Self {
            reminder_id: reminder.id,
            meeting_id: meeting.id,
            title: meeting.title.clone(),
            client_name: meeting.client.as_ref().map(|c| c.name.clone()),
            meeting_time: meeting.meeting_time,
            relative_time: relative_time_in(meeting.meeting_time, now, tz),
            meeting_link: meeting.meeting_link.clone(),
            display_secs: display.as_secs(),
        }
    }
}

/// Receives notification side effects from the engine.
///
/// Calls happen on the scheduler task and must not block; implementations
/// typically forward into a channel.
pub trait Notifier: Send + Sync {
    /// Show a notice for a reminder that just became due.
    fn notify(&self, notice: ReminderNotice);

    /// Withdraw the notice for a reminder that was dismissed.
    fn clear(&self, reminder_id: DbId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::reminder_due;
    use chrono::{Duration as ChronoDuration, Utc};

    #[test]
    fn notice_carries_meeting_and_client() {
        let meeting_time = Utc.with_ymd_and_hms(2026, 3, 5, 15, 30, 0).unwrap();
        let reminder = reminder_due(meeting_time - ChronoDuration::minutes(15))
            .with_meeting("Design review", meeting_time)
            .with_client("Acme")
            .build();

        let now = meeting_time - ChronoDuration::minutes(15);
        let notice = ReminderNotice::new(&reminder, now, &Utc, Duration::from_secs(60));

        assert_eq!(notice.reminder_id, reminder.id);
        assert_eq!(notice.title, "Design review");
        assert_eq!(notice.client_name.as_deref(), Some("Acme"));
        assert_eq!(notice.relative_time, "Today at 3:30 PM");
        assert_eq!(notice.display_secs, 60);
    }

    #[test]
    fn notice_serializes_flat() {
        let meeting_time = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        let reminder = reminder_due(meeting_time).build();
        let notice = ReminderNotice::new(&reminder, meeting_time, &Utc, Duration::from_secs(60));

        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["reminder_id"], reminder.id.to_string());
        assert!(json["client_name"].is_null());
        assert_eq!(json["display_secs"], 60);
    }
}
