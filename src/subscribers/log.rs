//! # Logging subscriber.
//!
//! [`LogWriter`] translates decision events into leveled [`tracing`] output:
//! stop events at `error`, pass and throttle events at `debug`, interrupted
//! throttling at `warn`. Installed by default by
//! [`RedeliveryGuard::new`](crate::RedeliveryGuard::new).
//!
//! ## Output levels
//! ```text
//! error  message-absent / redelivery-exceeded / lifespan-exceeded / transport-failed
//! warn   throttle-interrupted
//! debug  fresh-delivery / redelivery-accepted / lifespan-accepted / throttle-*
//! ```

use async_trait::async_trait;

use crate::events::{EventKind, GuardEvent};

use super::Subscribe;

/// Built-in subscriber emitting structured log records for every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, event: &GuardEvent) {
        let id = event.message_id.as_deref().unwrap_or("<no id>");

        match event.kind {
            EventKind::MessageAbsent => {
                tracing::error!(
                    "no message supplied; stopping processing to avoid potential poison message redelivery"
                );
            }
            EventKind::FreshDelivery => {
                tracing::debug!(
                    message_id = id,
                    "message not redelivered, allowing further processing"
                );
            }
            EventKind::RedeliveryExceeded => {
                tracing::error!(
                    message_id = id,
                    redelivery_count = event.redelivery_count,
                    limit = event.limit,
                    details = event.details.as_deref(),
                    "redelivery count exceeds limit; message dropped to prevent poison redelivery, investigate it"
                );
            }
            EventKind::RedeliveryAccepted => {
                tracing::debug!(
                    message_id = id,
                    redelivery_count = event.redelivery_count,
                    limit = event.limit,
                    "redelivery count within limit, not rejecting"
                );
            }
            EventKind::LifespanExceeded => {
                tracing::error!(
                    message_id = id,
                    lifespan_ms = event.lifespan_ms,
                    max_ttl_ms = event.max_ttl_ms,
                    details = event.details.as_deref(),
                    "message lifespan exceeds TTL; message dropped to prevent poison redelivery, investigate it"
                );
            }
            EventKind::LifespanAccepted => {
                tracing::debug!(
                    message_id = id,
                    lifespan_ms = event.lifespan_ms,
                    max_ttl_ms = event.max_ttl_ms,
                    "message lifespan within TTL, not rejecting"
                );
            }
            EventKind::ThrottleScheduled => {
                tracing::debug!(
                    message_id = id,
                    redelivery_count = event.redelivery_count,
                    delay_ms = event.delay_ms,
                    "message redelivered, throttling further processing"
                );
            }
            EventKind::ThrottleSkipped => {
                tracing::debug!(
                    message_id = id,
                    redelivery_count = event.redelivery_count,
                    "message redelivered, throttling not applied as not configured"
                );
            }
            EventKind::ThrottleInterrupted => {
                tracing::warn!(
                    message_id = id,
                    "ignoring interruption of throttling wait"
                );
            }
            EventKind::TransportFailed => {
                tracing::error!(
                    message_id = id,
                    reason = event.reason.as_deref(),
                    "unexpected transport failure while checking redelivery conditions; requires investigation, message not processed further"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
