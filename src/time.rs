//! # Clock and sleep collaborators.
//!
//! The guard reads wall-clock time once per TTL check and suspends once per
//! throttled message. Both capabilities are injected so the verdict logic can
//! be tested without real time: a manual [`Clock`] pins "now", a recording
//! [`Sleep`] asserts the throttle duration without waiting it out.
//!
//! Production wiring uses [`SystemClock`] and [`TokioSleep`]; the builder
//! installs them by default.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

/// Wall-clock source, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// System wall clock backed by [`std::time::SystemTime`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// A clock set before the Unix epoch reads as 0.
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis().min(i64::MAX as u128) as i64)
    }
}

/// Suspension capability used by the reception throttle.
#[async_trait]
pub trait Sleep: Send + Sync {
    /// Suspends the calling context for `delay`.
    async fn sleep(&self, delay: Duration);
}

/// Timer-backed sleep on the tokio runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z in ms; anything earlier means the clock math broke.
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[tokio::test]
    async fn test_tokio_sleep_returns() {
        TokioSleep.sleep(Duration::from_millis(1)).await;
    }
}
