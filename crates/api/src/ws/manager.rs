use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::Message;
use clienter_core::types::{DbId, Timestamp};
use clienter_reminders::ReminderService;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

use crate::ws::protocol::ServerMessage;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Authenticated owner of the connection.
    pub user_id: DbId,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// Stops the connection's reminder loop.
    pub cancel: CancellationToken,
    /// The connection's reminder engine, once started.
    pub service: Option<Arc<ReminderService>>,
    pub connected_at: Timestamp,
}

/// Tracks all open reminder streams.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns both halves of the outbound channel: the sender for producers
    /// on this connection and the receiver to forward into the socket.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: DbId,
        cancel: CancellationToken,
    ) -> (WsSender, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx.clone(),
            cancel,
            service: None,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        (tx, rx)
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Attach the reminder engine running on a connection.
    pub async fn attach_service(&self, conn_id: &str, service: Arc<ReminderService>) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.service = Some(service);
        }
    }

    /// Drop a dismissed reminder from every open stream of a user.
    ///
    /// Engines forget it immediately so it cannot fall due before their next
    /// fetch; connections still starting up only get `reminder_cleared`.
    /// Returns the number of connections reached.
    pub async fn forget_reminder(&self, user_id: DbId, reminder_id: DbId) -> usize {
        let targets: Vec<(WsSender, Option<Arc<ReminderService>>)> = self
            .connections
            .read()
            .await
            .values()
            .filter(|c| c.user_id == user_id)
            .map(|c| (c.sender.clone(), c.service.clone()))
            .collect();

        for (sender, service) in &targets {
            match service {
                Some(service) => {
                    service.forget(reminder_id).await;
                }
                None => {
                    if let Some(msg) = (ServerMessage::ReminderCleared { reminder_id }).to_message() {
                        let _ = sender.send(msg);
                    }
                }
            }
        }
        targets.len()
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Stop every reminder loop, send a Close frame to every connection,
    /// then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            conn.cancel.cancel();
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
