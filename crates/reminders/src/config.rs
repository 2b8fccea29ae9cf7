use std::time::Duration;

use clienter_core::reminder::{DEFAULT_GRACE_MINUTES, DEFAULT_NOTICE_SECS};

/// Upper bound on the grace window (one day).
pub const MAX_GRACE_MINUTES: i64 = 1440;

/// Timing knobs of the reminder engine.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// How often pending reminders are re-fetched from the store.
    pub fetch_interval: Duration,
    /// How often the active set is recomputed from the in-memory set.
    pub evaluate_interval: Duration,
    /// How long a past-due reminder stays eligible.
    pub grace: chrono::Duration,
    /// Minimum time a notification stays on screen.
    pub notice_duration: Duration,
    /// Upper bound on a dismiss write.
    pub dismiss_timeout: Duration,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            fetch_interval: Duration::from_secs(30),
            evaluate_interval: Duration::from_secs(10),
            grace: chrono::Duration::minutes(DEFAULT_GRACE_MINUTES),
            notice_duration: Duration::from_secs(DEFAULT_NOTICE_SECS),
            dismiss_timeout: Duration::from_secs(10),
        }
    }
}

impl ReminderConfig {
    /// Load configuration from environment variables, falling back to
    /// [`Default`] for anything unset.
    ///
    /// | Env var                            | Default |
    /// |------------------------------------|---------|
    /// | `REMINDER_FETCH_INTERVAL_SECS`     | `30`    |
    /// | `REMINDER_EVALUATE_INTERVAL_SECS`  | `10`    |
    /// | `REMINDER_GRACE_MINUTES`           | `5`     |
    /// | `REMINDER_NOTICE_SECS`             | `60`    |
    /// | `REMINDER_DISMISS_TIMEOUT_SECS`    | `10`    |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but is not a non-negative integer, or if
    /// the resulting configuration fails [`validate`](Self::validate).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fetch_interval = env_secs("REMINDER_FETCH_INTERVAL_SECS")
            .unwrap_or(defaults.fetch_interval);
        let evaluate_interval = env_secs("REMINDER_EVALUATE_INTERVAL_SECS")
            .unwrap_or(defaults.evaluate_interval);
        let grace = env_u64("REMINDER_GRACE_MINUTES")
            .map(|m| {
                grace_minutes(m).unwrap_or_else(|| {
                    panic!("REMINDER_GRACE_MINUTES must be at most {MAX_GRACE_MINUTES}")
                })
            })
            .unwrap_or(defaults.grace);
        let notice_duration =
            env_secs("REMINDER_NOTICE_SECS").unwrap_or(defaults.notice_duration);
        let dismiss_timeout =
            env_secs("REMINDER_DISMISS_TIMEOUT_SECS").unwrap_or(defaults.dismiss_timeout);

        let config = Self {
            fetch_interval,
            evaluate_interval,
            grace,
            notice_duration,
            dismiss_timeout,
        };
        if let Err(msg) = config.validate() {
            panic!("Invalid reminder configuration: {msg}");
        }
        config
    }

    /// Check the values the scheduler relies on.
    ///
    /// Tick intervals and the dismiss timeout must be non-zero; the grace
    /// window must lie in `0..=MAX_GRACE_MINUTES` minutes.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("fetch_interval", self.fetch_interval),
            ("evaluate_interval", self.evaluate_interval),
            ("dismiss_timeout", self.dismiss_timeout),
        ] {
            if value.is_zero() {
                return Err(format!("{name} must be greater than zero"));
            }
        }
        if self.grace < chrono::Duration::zero()
            || self.grace > chrono::Duration::minutes(MAX_GRACE_MINUTES)
        {
            return Err(format!(
                "grace must be between 0 and {MAX_GRACE_MINUTES} minutes, got {}",
                self.grace.num_minutes()
            ));
        }
        Ok(())
    }
}

fn grace_minutes(minutes: u64) -> Option<chrono::Duration> {
    i64::try_from(minutes)
        .ok()
        .filter(|m| *m <= MAX_GRACE_MINUTES)
        .map(chrono::Duration::minutes)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().map(|v| {
        v.parse()
            .unwrap_or_else(|_| panic!("{key} must be a non-negative integer"))
    })
}

fn env_secs(key: &str) -> Option<Duration> {
    env_u64(key).map(Duration::from_secs)
}
