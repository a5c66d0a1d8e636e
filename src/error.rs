//! Error type raised by broker message property reads.
//!
//! The guard treats every failing read of a transport-level property as one
//! coarse class of failure: [`TransportError`]. The guard itself never
//! surfaces it to callers — an unreadable redelivered message is converted
//! into a stop verdict (see [`RedeliveryGuard`](crate::RedeliveryGuard)).

use thiserror::Error;

/// Failure while reading a transport-level property off a broker message.
///
/// Raised by [`InboundMessage`](crate::InboundMessage) implementations when
/// the underlying transport cannot produce the requested property.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// A property read against the broker message failed.
    #[error("failed to read `{property}` from broker message: {reason}")]
    PropertyRead {
        /// Name of the property being read (e.g. `"redelivered"`).
        property: &'static str,
        /// Transport-supplied failure description.
        reason: String,
    },
}

impl TransportError {
    /// Creates a property-read failure for the given property.
    pub fn property_read(property: &'static str, reason: impl Into<String>) -> Self {
        TransportError::PropertyRead {
            property,
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use redelivery_guard::TransportError;
    ///
    /// let err = TransportError::property_read("redelivered", "session closed");
    /// assert_eq!(err.as_label(), "transport_property_read");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::PropertyRead { .. } => "transport_property_read",
        }
    }

    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        match self {
            TransportError::PropertyRead { property, reason } => {
                format!("property read failed: property={property} reason={reason}")
            }
        }
    }
}
