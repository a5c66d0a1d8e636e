//! # Guard configuration.
//!
//! [`GuardConfig`] defines the three policy limits applied to redelivered
//! messages: the redelivery-count ceiling, the message time-to-live, and the
//! reception throttle delay. Every limit has a disabled state (zero), so a
//! default-constructed config lets everything through untouched.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use redelivery_guard::GuardConfig;
//!
//! let mut cfg = GuardConfig::default();
//! cfg.max_redelivery_count = 10;
//! cfg.max_message_ttl = Duration::from_secs(10);
//! cfg.reception_delay = Duration::from_secs(1);
//!
//! assert_eq!(cfg.max_redelivery_count, 10);
//! ```

use std::time::Duration;

/// Policy limits for redelivered messages.
///
/// Immutable for the guard's lifetime: the guard copies the config at build
/// time and never mutates it. Decisions are a pure function of
/// (message, current time, configuration).
#[derive(Clone, Copy, Debug)]
pub struct GuardConfig {
    /// Maximum allowed redelivery count (0 = no limit).
    ///
    /// The boundary is exclusive: a count exactly equal to the limit still
    /// passes; only exceeding it stops processing.
    pub max_redelivery_count: u32,
    /// Maximum message lifespan measured against the broker timestamp
    /// (zero = no limit).
    pub max_message_ttl: Duration,
    /// Delay applied before a redelivered message is released to the caller
    /// (zero = no throttling).
    pub reception_delay: Duration,
}

impl Default for GuardConfig {
    /// Provides a default configuration with every check disabled:
    /// - `max_redelivery_count = 0` (no redelivery limit)
    /// - `max_message_ttl = 0s` (no TTL limit)
    /// - `reception_delay = 0s` (no throttling)
    fn default() -> Self {
        Self {
            max_redelivery_count: 0,
            max_message_ttl: Duration::ZERO,
            reception_delay: Duration::ZERO,
        }
    }
}

impl GuardConfig {
    /// Returns `true` if the redelivery-count check is enabled.
    #[inline]
    pub fn redelivery_limit_enabled(&self) -> bool {
        self.max_redelivery_count > 0
    }

    /// Returns `true` if the TTL check is enabled.
    #[inline]
    pub fn ttl_enabled(&self) -> bool {
        !self.max_message_ttl.is_zero()
    }

    /// Returns `true` if redelivered messages are throttled on reception.
    #[inline]
    pub fn throttling_enabled(&self) -> bool {
        !self.reception_delay.is_zero()
    }
}
