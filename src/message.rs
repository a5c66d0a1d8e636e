//! # Inbound message capability interface.
//!
//! [`InboundMessage`] is the narrow surface the guard requires from a broker
//! message. It is deliberately not a wire format: the consuming side adapts
//! whatever its transport hands out (an AMQP delivery, a JMS-style message,
//! an in-memory fake in tests) behind these four reads.
//!
//! Every transport-level read can fail with a [`TransportError`]; the guard
//! converts any such failure into a stop verdict rather than propagating it.

use crate::error::TransportError;

/// Read-only view over a broker-delivered message.
///
/// Implementations adapt a concrete transport's message type. All reads take
/// `&self`; the guard never mutates or consumes the message.
///
/// # Example
/// ```
/// use redelivery_guard::{InboundMessage, TransportError};
///
/// struct Delivery {
///     redelivered: bool,
///     attempts: u32,
///     sent_at_ms: i64,
/// }
///
/// impl InboundMessage for Delivery {
///     fn id(&self) -> Option<String> {
///         None
///     }
///
///     fn is_redelivered(&self) -> Result<bool, TransportError> {
///         Ok(self.redelivered)
///     }
///
///     fn redelivery_count(&self) -> Result<u32, TransportError> {
///         Ok(self.attempts)
///     }
///
///     fn sent_at_ms(&self) -> Result<i64, TransportError> {
///         Ok(self.sent_at_ms)
///     }
/// }
/// ```
pub trait InboundMessage: Send + Sync {
    /// Returns the broker-assigned message identifier, if any.
    ///
    /// Used for diagnostics only; decisions never depend on it.
    fn id(&self) -> Option<String>;

    /// Returns `true` if the broker has attempted delivery of this message
    /// more than once.
    fn is_redelivered(&self) -> Result<bool, TransportError>;

    /// Returns the number of delivery attempts recorded by the broker.
    ///
    /// Meaningful only when [`is_redelivered`](Self::is_redelivered) returned
    /// `true`.
    fn redelivery_count(&self) -> Result<u32, TransportError>;

    /// Returns the broker-clock time at which the message was originally
    /// sent, in milliseconds since the Unix epoch.
    fn sent_at_ms(&self) -> Result<i64, TransportError>;

    /// Returns a diagnostic dump of the message for error-level output.
    ///
    /// The default builds one from the other reads, swallowing read failures;
    /// override it to expose transport-specific detail (destination, payload
    /// excerpt, headers).
    fn details(&self) -> String {
        format!(
            "id={:?} redelivered={:?} redelivery_count={:?} sent_at_ms={:?}",
            self.id(),
            self.is_redelivered().ok(),
            self.redelivery_count().ok(),
            self.sent_at_ms().ok(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl InboundMessage for Plain {
        fn id(&self) -> Option<String> {
            Some("m-1".to_string())
        }

        fn is_redelivered(&self) -> Result<bool, TransportError> {
            Ok(true)
        }

        fn redelivery_count(&self) -> Result<u32, TransportError> {
            Ok(3)
        }

        fn sent_at_ms(&self) -> Result<i64, TransportError> {
            Ok(42)
        }
    }

    struct Broken;

    impl InboundMessage for Broken {
        fn id(&self) -> Option<String> {
            None
        }

        fn is_redelivered(&self) -> Result<bool, TransportError> {
            Err(TransportError::property_read("redelivered", "gone"))
        }

        fn redelivery_count(&self) -> Result<u32, TransportError> {
            Err(TransportError::property_read("redelivery_count", "gone"))
        }

        fn sent_at_ms(&self) -> Result<i64, TransportError> {
            Err(TransportError::property_read("timestamp", "gone"))
        }
    }

    #[test]
    fn test_default_details_includes_reads() {
        let text = Plain.details();
        assert!(text.contains("m-1"), "missing id in: {text}");
        assert!(text.contains("redelivery_count=Some(3)"), "got: {text}");
    }

    #[test]
    fn test_default_details_survives_read_failures() {
        let text = Broken.details();
        assert!(text.contains("redelivered=None"), "got: {text}");
    }
}
