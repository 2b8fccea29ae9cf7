//! Reminder eligibility window.
//!
//! A reminder is *active* from its `remind_at` instant until the grace
//! window has elapsed. Reminders further in the past than the grace window
//! are never fetched, so a long-closed session does not resurface stale
//! alerts.

use chrono::Duration;

use crate::types::Timestamp;

/// Default trailing window during which a past-due reminder is still shown.
pub const DEFAULT_GRACE_MINUTES: i64 = 5;

/// Default minimum time a reminder notification stays visible.
pub const DEFAULT_NOTICE_SECS: u64 = 60;

/// Oldest `remind_at` still worth fetching at `now` (inclusive bound).
pub fn fetch_cutoff(now: Timestamp, grace: Duration) -> Timestamp {
    now - grace
}

/// Whether a reminder due at `remind_at` is inside the fetch window.
pub fn within_fetch_window(remind_at: Timestamp, now: Timestamp, grace: Duration) -> bool {
    remind_at >= fetch_cutoff(now, grace)
}

/// Whether a reminder due at `remind_at` is active at `now`:
/// `0 <= now - remind_at <= grace`.
pub fn is_active(remind_at: Timestamp, now: Timestamp, grace: Duration) -> bool {
    let elapsed = now - remind_at;
    elapsed >= Duration::zero() && elapsed <= grace
}
