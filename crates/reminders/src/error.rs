use std::time::Duration;

use clienter_core::types::DbId;

/// Failures of the reminder store seam.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("Reminder store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Reminder store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Reminder not found: {0}")]
    NotFound(DbId),
}
