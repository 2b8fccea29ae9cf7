//! Per-user reminder scheduler.
//!
//! [`ReminderService`] binds a [`ReminderEngine`] to a store, a notifier and
//! a clock. [`run`](ReminderService::run) drives it from a single task:
//!
//! - fetch tick: `refresh` then `evaluate`
//! - evaluate tick: `evaluate`
//!
//! Dismissals may arrive concurrently from the host; they write to the store
//! first and touch local state only once the write is confirmed.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use clienter_core::reminder::fetch_cutoff;
use clienter_core::types::DbId;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::ReminderConfig;
use crate::engine::{ReminderEngine, Transition};
use crate::error::ReminderError;
use crate::notifier::{Notifier, ReminderNotice};
use crate::store::ReminderStore;

pub struct ReminderService {
    user_id: DbId,
    store: Arc<dyn ReminderStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: ReminderConfig,
    /// Offset used to phrase meeting times ("Today at ...").
    utc_offset: FixedOffset,
    engine: Mutex<ReminderEngine>,
}

impl ReminderService {
    pub fn new(
        user_id: DbId,
        store: Arc<dyn ReminderStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: ReminderConfig,
    ) -> Self {
        let engine = Mutex::new(ReminderEngine::new(config.grace));
        Self {
            user_id,
            store,
            notifier,
            clock,
            config,
            utc_offset: Utc.fix(),
            engine,
        }
    }

    /// Phrase notice times in the given offset instead of UTC.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn user_id(&self) -> DbId {
        self.user_id
    }

    /// Re-fetch pending reminders and replace the working set.
    ///
    /// On failure the previous working set is kept and the error returned;
    /// the next fetch tick retries.
    pub async fn refresh(&self) -> Result<usize, ReminderError> {
        let now = self.clock.now();
        let since = fetch_cutoff(now, self.config.grace);

        match self.store.fetch_pending(self.user_id, since).await {
            Ok(fetched) => {
                let mut engine = self.engine.lock().await;
                // The fetch may have taken a while; filter against the current time.
                engine.replace(fetched, self.clock.now());
                let count = engine.reminders().len();
                tracing::debug!(user_id = %self.user_id, count, "Refreshed reminders");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %self.user_id,
                    error = %e,
                    "Failed to fetch reminders, keeping previous set"
                );
                Err(e)
            }
        }
    }

    /// Recompute the active set and notify once for each newly due reminder.
    pub async fn evaluate(&self) -> Transition {
        let now = self.clock.now();
        let (transition, notices) = {
            let mut engine = self.engine.lock().await;
            let transition = engine.evaluate(now);
            let notices: Vec<ReminderNotice> = transition
                .entered
                .iter()
                .filter_map(|id| engine.get(*id))
                .map(|r| {
                    ReminderNotice::new(r, now, &self.utc_offset, self.config.notice_duration)
                })
                .collect();
            (transition, notices)
        };

        for notice in notices {
            tracing::info!(
                user_id = %self.user_id,
                reminder_id = %notice.reminder_id,
                meeting_id = %notice.meeting_id,
                "Reminder due"
            );
            self.notifier.notify(notice);
        }
        if !transition.expired.is_empty() {
            tracing::debug!(
                user_id = %self.user_id,
                expired = transition.expired.len(),
                "Reminders left the active window"
            );
        }
        transition
    }

    /// Dismiss a reminder.
    ///
    /// The store write happens first, bounded by the configured timeout.
    /// Local state and the visible notice change only once the write is
    /// confirmed. If the store has no such reminder it is dropped locally
    /// and [`ReminderError::NotFound`] returned.
    pub async fn dismiss(&self, reminder_id: DbId) -> Result<(), ReminderError> {
        let at = self.clock.now();
        let timeout = self.config.dismiss_timeout;

        let written = tokio::time::timeout(
            timeout,
            self.store.dismiss(self.user_id, reminder_id, at),
        )
        .await
        .map_err(|_| ReminderError::Timeout(timeout))
        .and_then(|result| result);

        match written {
            Ok(found) => {
                self.engine.lock().await.remove(reminder_id);
                self.notifier.clear(reminder_id);
                self.evaluate().await;

                if found {
                    tracing::info!(user_id = %self.user_id, %reminder_id, "Reminder dismissed");
                    Ok(())
                } else {
                    tracing::warn!(user_id = %self.user_id, %reminder_id, "Dismissed unknown reminder");
                    Err(ReminderError::NotFound(reminder_id))
                }
            }
            Err(e) => {
                tracing::error!(
                    user_id = %self.user_id,
                    %reminder_id,
                    error = %e,
                    "Failed to dismiss reminder"
                );
                Err(e)
            }
        }
    }

    /// Drop a reminder that was dismissed through another channel.
    ///
    /// The store already holds the dismissal, so nothing is written. The
    /// reminder leaves the working set at once instead of on the next fetch,
    /// which keeps it from alerting in between. Returns `true` if it was in
    /// the working set.
    pub async fn forget(&self, reminder_id: DbId) -> bool {
        let removed = self.engine.lock().await.remove(reminder_id);
        self.notifier.clear(reminder_id);
        tracing::debug!(user_id = %self.user_id, %reminder_id, removed, "Reminder dismissed elsewhere");
        removed
    }

    /// Ids of the reminders currently active, in due order.
    pub async fn active(&self) -> Vec<DbId> {
        self.engine.lock().await.active().to_vec()
    }

    /// Number of reminders in the working set.
    pub async fn pending(&self) -> usize {
        self.engine.lock().await.reminders().len()
    }

    /// Run the fetch and evaluate loop until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut fetch = tokio::time::interval(self.config.fetch_interval);
        let mut evaluate = tokio::time::interval(self.config.evaluate_interval);
        fetch.set_missed_tick_behavior(MissedTickBehavior::Delay);
        evaluate.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(user_id = %self.user_id, "Reminder scheduler started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = fetch.tick() => {
                    // Failures are logged in `refresh`; stale data stays usable.
                    let _ = self.refresh().await;
                    if cancel.is_cancelled() {
                        break;
                    }
                    self.evaluate().await;
                }
                _ = evaluate.tick() => {
                    self.evaluate().await;
                }
            }
        }

        tracing::debug!(user_id = %self.user_id, "Reminder scheduler stopped");
    }
}
