use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use chrono::FixedOffset;
use clienter_core::types::DbId;
use clienter_reminders::{PgReminderStore, ReminderError, ReminderService, SystemClock};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::WsSender;
use crate::ws::notifier::WsNotifier;
use crate::ws::protocol::{ClientMessage, ServerMessage};

/// Query parameters of the upgrade request.
///
/// Browsers cannot set headers on WebSocket requests, so the access token
/// travels in the query string.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
    /// Minutes east of UTC used to phrase notice times.
    pub tz_offset: Option<i32>,
}

/// HTTP handler that authenticates and upgrades the connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> AppResult<Response> {
    let user = AuthUser::from_token(&params.token, &state)?;
    let offset = params
        .tz_offset
        .map(|minutes| {
            minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid tz_offset: {minutes}")))
        })
        .transpose()?;

    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state, user.user_id, offset))
        .into_response())
}

/// Manage a single reminder stream after upgrade.
///
/// 1. Registers the connection with `WsManager`.
/// 2. Starts the connection's reminder loop under a child of the server's
///    shutdown token and attaches the engine to the connection entry.
/// 3. Spawns a sender task that forwards queued messages to the socket.
/// 4. Processes inbound dismiss commands on the current task.
/// 5. Cancels the loop and cleans up on disconnect.
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    user_id: DbId,
    offset: Option<FixedOffset>,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let cancel = state.shutdown.child_token();
    let (tx, mut rx) = state
        .ws_manager
        .add(conn_id.clone(), user_id, cancel.clone())
        .await;
    tracing::info!(conn_id = %conn_id, %user_id, "Reminder stream connected");

    let mut service = ReminderService::new(
        user_id,
        Arc::new(PgReminderStore::new(state.pool.clone())),
        Arc::new(WsNotifier::new(tx.clone())),
        Arc::new(SystemClock),
        state.config.reminders.clone(),
    );
    if let Some(offset) = offset {
        service = service.with_utc_offset(offset);
    }
    let service = Arc::new(service);
    state
        .ws_manager
        .attach_service(&conn_id, Arc::clone(&service))
        .await;

    let run_task = tokio::spawn({
        let service = Arc::clone(&service);
        let cancel = cancel.clone();
        async move { service.run(cancel).await }
    });

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages until the peer leaves or the
    // server shuts down.
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next() => match next {
                Some(result) => result,
                None => break,
            },
        };

        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(ClientMessage::Dismiss { reminder_id }) => {
                    tokio::spawn(dismiss(Arc::clone(&service), tx.clone(), reminder_id));
                }
                Err(e) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Ignoring malformed message");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: stop the reminder loop, unregister, stop the sender.
    cancel.cancel();
    let _ = run_task.await;
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, %user_id, "Reminder stream disconnected");
}

/// Run one dismissal and report a failure back to the browser.
///
/// Success needs no reply: the service already sent `reminder_cleared`.
async fn dismiss(service: Arc<ReminderService>, tx: WsSender, reminder_id: DbId) {
    match service.dismiss(reminder_id).await {
        Ok(()) | Err(ReminderError::NotFound(_)) => {}
        Err(e) => {
            let reply = ServerMessage::DismissFailed {
                reminder_id,
                error: e.to_string(),
            };
            if let Some(msg) = reply.to_message() {
                let _ = tx.send(msg);
            }
        }
    }
}
