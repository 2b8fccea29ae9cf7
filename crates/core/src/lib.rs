//! Clienter domain core.
//!
//! Pure domain logic with zero internal deps so it can be shared by the
//! repository layer, the reminder engine and the HTTP API.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod meeting;
pub mod reminder;
pub mod types;
