//! JSON messages exchanged on the reminder stream.

use axum::extract::ws::Message;
use clienter_core::types::DbId;
use clienter_reminders::ReminderNotice;
use serde::{Deserialize, Serialize};

/// Server to browser.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A reminder just became due.
    Reminder { data: ReminderNotice },
    /// A reminder was dismissed; hide its notice.
    ReminderCleared { reminder_id: DbId },
    /// A dismissal could not be stored; the notice stays and may be retried.
    DismissFailed { reminder_id: DbId, error: String },
}

impl ServerMessage {
    pub fn to_message(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(text) => Some(Message::Text(text.into())),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize WebSocket message");
                None
            }
        }
    }
}

/// Browser to server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Dismiss { reminder_id: DbId },
}
