//! Time source for the reminder engine.

use chrono::Utc;
use clienter_core::types::Timestamp;

/// Wall-clock source. Injected so evaluation can be driven deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
