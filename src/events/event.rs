//! # Events emitted while deciding the fate of an inbound message.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Stop events**: the message must not be processed further
//!   (absent input, limit exceeded, transport failure)
//! - **Pass events**: a check ran and let the message through
//! - **Throttle events**: the reception delay was applied, skipped, or
//!   interrupted
//!
//! The [`GuardEvent`] struct carries additional metadata such as the message
//! id, observed redelivery count, configured limits, and the diagnostic dump.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Within one `should_stop` call events are emitted in
//! decision order.
//!
//! ## Example
//! ```rust
//! use redelivery_guard::{EventKind, GuardEvent};
//!
//! let ev = GuardEvent::new(EventKind::RedeliveryExceeded)
//!     .with_message_id("m-17")
//!     .with_redelivery_count(11)
//!     .with_limit(10);
//!
//! assert_eq!(ev.kind, EventKind::RedeliveryExceeded);
//! assert_eq!(ev.message_id.as_deref(), Some("m-17"));
//! assert_eq!(ev.redelivery_count, Some(11));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of guard decision events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Stop events ===
    /// No message was supplied (null/absent reference upstream).
    ///
    /// Sets:
    /// - `reason`: description of the malformed call
    MessageAbsent,

    /// Redelivery count exceeded the configured limit.
    ///
    /// Sets:
    /// - `message_id`: broker message id, if present
    /// - `redelivery_count`: observed count
    /// - `limit`: configured maximum
    /// - `details`: diagnostic dump of the message
    RedeliveryExceeded,

    /// Message lifespan exceeded the configured TTL.
    ///
    /// Sets:
    /// - `message_id`: broker message id, if present
    /// - `lifespan_ms`: observed age (current time minus broker timestamp)
    /// - `max_ttl_ms`: configured maximum in milliseconds
    /// - `details`: diagnostic dump of the message
    LifespanExceeded,

    /// A transport-level property read failed; processing stops to avoid
    /// redelivering an uninspectable message forever.
    ///
    /// Sets:
    /// - `message_id`: broker message id, if present
    /// - `reason`: the underlying read failure
    TransportFailed,

    // === Pass events ===
    /// Message was not redelivered; processing allowed with no further checks.
    ///
    /// Sets:
    /// - `message_id`: broker message id, if present
    FreshDelivery,

    /// Redelivery count is within the configured limit.
    ///
    /// Sets:
    /// - `message_id`, `redelivery_count`, `limit`
    RedeliveryAccepted,

    /// Message lifespan is within the configured TTL.
    ///
    /// Sets:
    /// - `message_id`, `lifespan_ms`, `max_ttl_ms`
    LifespanAccepted,

    // === Throttle events ===
    /// Reception delay is being applied before the verdict is returned.
    ///
    /// Sets:
    /// - `message_id`, `redelivery_count`
    /// - `delay_ms`: configured reception delay
    ThrottleScheduled,

    /// Throttling not applied because no delay is configured.
    ///
    /// Sets:
    /// - `message_id`, `redelivery_count`
    ThrottleSkipped,

    /// The throttling wait was interrupted externally; the interruption is
    /// swallowed and the verdict is unaffected.
    ///
    /// Sets:
    /// - `message_id`
    ThrottleInterrupted,
}

impl EventKind {
    /// Returns `true` for kinds that accompany a stop verdict.
    #[inline]
    pub fn is_stop(&self) -> bool {
        matches!(
            self,
            EventKind::MessageAbsent
                | EventKind::RedeliveryExceeded
                | EventKind::LifespanExceeded
                | EventKind::TransportFailed
        )
    }
}

/// Decision event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct GuardEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Broker message id, if the message carries one.
    pub message_id: Option<Arc<str>>,
    /// Redelivery count observed on the message.
    pub redelivery_count: Option<u32>,
    /// Configured redelivery-count limit.
    pub limit: Option<u32>,
    /// Observed message age in milliseconds.
    pub lifespan_ms: Option<i64>,
    /// Configured TTL in milliseconds (compact).
    pub max_ttl_ms: Option<u64>,
    /// Reception delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (read failures, malformed input).
    pub reason: Option<Arc<str>>,
    /// Diagnostic dump of the message, attached to error-grade events.
    pub details: Option<Arc<str>>,
}

impl GuardEvent {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            message_id: None,
            redelivery_count: None,
            limit: None,
            lifespan_ms: None,
            max_ttl_ms: None,
            delay_ms: None,
            reason: None,
            details: None,
        }
    }

    /// Attaches the broker message id.
    #[inline]
    pub fn with_message_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Attaches the broker message id when the message carries one.
    #[inline]
    pub fn with_message_id_opt(mut self, id: Option<String>) -> Self {
        self.message_id = id.map(Arc::from);
        self
    }

    /// Attaches the observed redelivery count.
    #[inline]
    pub fn with_redelivery_count(mut self, count: u32) -> Self {
        self.redelivery_count = Some(count);
        self
    }

    /// Attaches the configured redelivery-count limit.
    #[inline]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attaches the observed message age in milliseconds.
    #[inline]
    pub fn with_lifespan_ms(mut self, lifespan_ms: i64) -> Self {
        self.lifespan_ms = Some(lifespan_ms);
        self
    }

    /// Attaches the configured TTL (stored as milliseconds).
    #[inline]
    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        let ms = ttl.as_millis().min(u128::from(u64::MAX)) as u64;
        self.max_ttl_ms = Some(ms);
        self
    }

    /// Attaches the reception delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        let ms = delay.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the diagnostic dump of the message.
    #[inline]
    pub fn with_details(mut self, details: impl Into<Arc<str>>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = GuardEvent::new(EventKind::FreshDelivery);
        let b = GuardEvent::new(EventKind::FreshDelivery);
        assert!(b.seq > a.seq, "seq must increase: {} then {}", a.seq, b.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = GuardEvent::new(EventKind::LifespanExceeded)
            .with_message_id("m-1")
            .with_lifespan_ms(12_500)
            .with_max_ttl(Duration::from_secs(10))
            .with_details("dump");

        assert_eq!(ev.message_id.as_deref(), Some("m-1"));
        assert_eq!(ev.lifespan_ms, Some(12_500));
        assert_eq!(ev.max_ttl_ms, Some(10_000));
        assert_eq!(ev.details.as_deref(), Some("dump"));
    }

    #[test]
    fn test_absent_id_stays_unset() {
        let ev = GuardEvent::new(EventKind::FreshDelivery).with_message_id_opt(None);
        assert!(ev.message_id.is_none());
    }

    #[test]
    fn test_stop_kinds() {
        assert!(EventKind::MessageAbsent.is_stop());
        assert!(EventKind::RedeliveryExceeded.is_stop());
        assert!(EventKind::LifespanExceeded.is_stop());
        assert!(EventKind::TransportFailed.is_stop());
        assert!(!EventKind::FreshDelivery.is_stop());
        assert!(!EventKind::ThrottleScheduled.is_stop());
    }
}
