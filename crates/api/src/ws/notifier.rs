use clienter_core::types::DbId;
use clienter_reminders::{Notifier, ReminderNotice};

use crate::ws::manager::WsSender;
use crate::ws::protocol::ServerMessage;

/// Delivers reminder notices to one WebSocket connection.
pub struct WsNotifier {
    sender: WsSender,
}

impl WsNotifier {
    pub fn new(sender: WsSender) -> Self {
        Self { sender }
    }

    fn send(&self, message: ServerMessage) {
        if let Some(msg) = message.to_message() {
            // A closed channel means the connection is going away.
            let _ = self.sender.send(msg);
        }
    }
}

impl Notifier for WsNotifier {
    fn notify(&self, notice: ReminderNotice) {
        self.send(ServerMessage::Reminder { data: notice });
    }

    fn clear(&self, reminder_id: DbId) {
        self.send(ServerMessage::ReminderCleared { reminder_id });
    }
}
