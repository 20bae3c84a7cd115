//! Reconnect policy for the chat transport.
//!
//! Two policies, selected by configuration: the main chat flow connects
//! once and stays down after a disconnect, while sessions that must
//! survive transient network blips retry a bounded number of times with
//! linearly increasing delay.

use std::time::Duration;

/// Base delay between reconnect attempts for [`ReconnectPolicy::bounded`].
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Maximum reconnect attempts for [`ReconnectPolicy::bounded`].
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// What the transport does after losing its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Never reconnect automatically.
    FireOnce,
    /// Retry up to `max_attempts` times, waiting `base_delay × attempt
    /// number` before each attempt (strictly increasing delays).
    BoundedRetry {
        /// Delay multiplier.
        base_delay: Duration,
        /// Attempt cap; once reached the transport gives up.
        max_attempts: u32,
    },
}

impl ReconnectPolicy {
    /// Bounded retry with the default schedule (1s, 2s, 3s, 4s, 5s).
    pub fn bounded() -> Self {
        Self::BoundedRetry {
            base_delay: DEFAULT_RETRY_BASE_DELAY,
            max_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }

    /// Delay before the next reconnect attempt, given how many attempts
    /// have already been made since the last successful connection.
    /// `None` means give up (or, for fire-once, never start).
    pub fn next_delay(&self, completed_attempts: u32) -> Option<Duration> {
        match *self {
            Self::FireOnce => None,
            Self::BoundedRetry { base_delay, max_attempts } => {
                (completed_attempts < max_attempts)
                    .then(|| base_delay * (completed_attempts + 1))
            },
        }
    }
}
