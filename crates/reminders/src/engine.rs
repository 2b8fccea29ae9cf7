//! Pure reminder state machine.
//!
//! The engine owns the working set of pending reminders and the subset that
//! is currently active. It performs no I/O and reads no clock: callers pass
//! `now` into every operation, which keeps evaluation deterministic.

use std::collections::HashSet;

use chrono::Duration;
use clienter_core::reminder::{is_active, within_fetch_window};
use clienter_core::types::{DbId, Timestamp};
use clienter_db::models::reminder::ReminderWithMeeting;

/// Change in the active set produced by one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Reminders that became active, in due order. Each gets one notification.
    pub entered: Vec<DbId>,
    /// Reminders that left the active window without being dismissed.
    pub expired: Vec<DbId>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.expired.is_empty()
    }
}

#[derive(Debug)]
pub struct ReminderEngine {
    grace: Duration,
    /// Undismissed reminders inside the fetch window, sorted by `remind_at`.
    reminders: Vec<ReminderWithMeeting>,
    /// Ids of `reminders` currently inside the active window.
    active: Vec<DbId>,
    /// Locally confirmed dismissals, keyed by due time so a rescheduled
    /// reminder with the same id is not suppressed.
    dismissed: HashSet<(DbId, Timestamp)>,
}

impl ReminderEngine {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            reminders: Vec::new(),
            active: Vec::new(),
            dismissed: HashSet::new(),
        }
    }

    /// Replace the working set with a fresh fetch.
    ///
    /// Rows that are dismissed, older than the fetch window, or dismissed
    /// locally but not yet reflected by the store are dropped. The active set
    /// is not touched; call [`evaluate`](Self::evaluate) afterwards.
    pub fn replace(&mut self, fetched: Vec<ReminderWithMeeting>, now: Timestamp) {
        let fetched_ids: HashSet<DbId> = fetched.iter().map(|r| r.id).collect();
        self.dismissed.retain(|(id, _)| fetched_ids.contains(id));

        let mut reminders: Vec<ReminderWithMeeting> = fetched
            .into_iter()
            .filter(|r| !r.is_dismissed)
            .filter(|r| within_fetch_window(r.remind_at, now, self.grace))
            .filter(|r| !self.dismissed.contains(&(r.id, r.remind_at)))
            .collect();
        reminders.sort_by_key(|r| r.remind_at);
        self.reminders = reminders;
    }

    /// Recompute the active set at `now` and report what changed.
    ///
    /// Calling this twice with the same `now` yields an empty transition the
    /// second time.
    pub fn evaluate(&mut self, now: Timestamp) -> Transition {
        let next: Vec<DbId> = self
            .reminders
            .iter()
            .filter(|r| is_active(r.remind_at, now, self.grace))
            .map(|r| r.id)
            .collect();

        let entered = next
            .iter()
            .filter(|id| !self.active.contains(id))
            .copied()
            .collect();
        let expired = self
            .active
            .iter()
            .filter(|id| !next.contains(id))
            .copied()
            .collect();

        self.active = next;
        Transition { entered, expired }
    }

    /// Forget a reminder after the store confirmed its dismissal.
    ///
    /// Returns `true` if it was in the working set.
    pub fn remove(&mut self, reminder_id: DbId) -> bool {
        self.active.retain(|id| *id != reminder_id);
        match self.reminders.iter().position(|r| r.id == reminder_id) {
            Some(index) => {
                let reminder = self.reminders.remove(index);
                self.dismissed.insert((reminder.id, reminder.remind_at));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, reminder_id: DbId) -> Option<&ReminderWithMeeting> {
        self.reminders.iter().find(|r| r.id == reminder_id)
    }

    pub fn reminders(&self) -> &[ReminderWithMeeting] {
        &self.reminders
    }

    pub fn active(&self) -> &[DbId] {
        &self.active
    }

    pub fn is_active(&self, reminder_id: DbId) -> bool {
        self.active.contains(&reminder_id)
    }
}
