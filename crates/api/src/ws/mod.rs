//! WebSocket reminder stream.
//!
//! Each authenticated connection hosts its own reminder engine: due
//! reminders are pushed to the browser as they become active and the browser
//! dismisses them over the same socket.

mod handler;
mod heartbeat;
pub mod manager;
mod notifier;
pub mod protocol;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
pub use notifier::WsNotifier;
