//! Per-user reminder engine.
//!
//! A [`ReminderService`] keeps the user's pending reminders in memory,
//! re-fetching them from a [`ReminderStore`] on a fixed cadence and
//! re-evaluating which are due on a shorter one. Reminders that become due
//! are pushed once to a [`Notifier`]; dismissals are written through to the
//! store before local state changes.
//!
//! The decision logic lives in the pure [`ReminderEngine`]; the service only
//! wires it to time, storage and delivery.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod notifier;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clock::{Clock, SystemClock};
pub use config::ReminderConfig;
pub use engine::{ReminderEngine, Transition};
pub use error::ReminderError;
pub use notifier::{Notifier, ReminderNotice};
pub use service::ReminderService;
pub use store::{PgReminderStore, ReminderStore};
