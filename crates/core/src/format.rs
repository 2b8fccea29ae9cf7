//! Human-readable time formatting for notifications.

use chrono::{DateTime, Duration, TimeZone};

/// Format `at` relative to `now`, both viewed in `tz`.
///
/// - same calendar day: `Today at 3:30 PM`
/// - next calendar day: `Tomorrow at 9:05 AM`
/// - otherwise: `Mar 5, 2026 at 3:30 PM`
pub fn relative_time<Tz: TimeZone>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = at.date_naive();
    let today = now.date_naive();
    let time = at.format("%-I:%M %p");

    if day == today {
        format!("Today at {time}")
    } else if Some(day) == today.checked_add_signed(Duration::days(1)) {
        format!("Tomorrow at {time}")
    } else {
        format!("{} at {time}", at.format("%b %-d, %Y"))
    }
}

/// Convenience wrapper that views both instants in `tz` first.
pub fn relative_time_in<Tz: TimeZone>(
    at: crate::types::Timestamp,
    now: crate::types::Timestamp,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    relative_time(&at.with_timezone(tz), &now.with_timezone(tz))
}
