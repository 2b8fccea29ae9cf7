pub mod client;
pub mod health;
pub mod meeting;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{dashboard, profile, reminder};
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=<jwt>                       reminder stream (WebSocket)
///
/// /profile                              get, update
/// /dashboard                            summary
///
/// /clients                              list (?status=), create
/// /clients/board                        kanban columns
/// /clients/{id}                         get, update, delete
/// /clients/{id}/move                    drag-and-drop move (POST)
/// /clients/{id}/meetings                meetings with the client
///
/// /meetings                             list, create
/// /meetings/{id}                        get, update, delete
///
/// /reminders                            pending reminders
/// /reminders/{id}/dismiss               dismiss (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/profile", get(profile::get).put(profile::update))
        .route("/dashboard", get(dashboard::get))
        .nest("/clients", client::router())
        .nest("/meetings", meeting::router())
        .route("/reminders", get(reminder::list))
        .route("/reminders/{id}/dismiss", post(reminder::dismiss))
}
