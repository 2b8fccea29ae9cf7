//! Storage seam for the reminder engine.

use async_trait::async_trait;
use clienter_core::types::{DbId, Timestamp};
use clienter_db::models::reminder::ReminderWithMeeting;
use clienter_db::repositories::ReminderRepo;
use clienter_db::DbPool;

use crate::error::ReminderError;

/// Where pending reminders come from and where dismissals go.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Undismissed reminders of `user_id` due at or after `since`, with their
    /// meeting and client attached, earliest first.
    async fn fetch_pending(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ReminderWithMeeting>, ReminderError>;

    /// Mark a reminder dismissed. Returns `false` if the user has no such
    /// reminder.
    async fn dismiss(
        &self,
        user_id: DbId,
        reminder_id: DbId,
        at: Timestamp,
    ) -> Result<bool, ReminderError>;
}

/// [`ReminderStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgReminderStore {
    pool: DbPool,
}

impl PgReminderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    async fn fetch_pending(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ReminderWithMeeting>, ReminderError> {
        Ok(ReminderRepo::list_pending(&self.pool, user_id, Some(since), None).await?)
    }

    async fn dismiss(
        &self,
        user_id: DbId,
        reminder_id: DbId,
        at: Timestamp,
    ) -> Result<bool, ReminderError> {
        Ok(ReminderRepo::dismiss(&self.pool, user_id, reminder_id, at).await?)
    }
}
