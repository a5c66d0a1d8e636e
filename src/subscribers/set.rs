//! # SubscriberSet: sequential fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`GuardEvent`] to every subscriber in
//! installation order, awaiting each handler before moving on.
//!
//! ## What it guarantees
//! - Delivery order matches decision order, per subscriber and across
//!   subscribers (single-threaded fan-out, no queues).
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - Non-blocking emission: a slow subscriber delays the verdict. Verdicts
//!   are synchronous decisions, so deterministic inline delivery is the
//!   contract here; push buffering into the subscriber if it needs it.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::events::GuardEvent;

use super::Subscribe;

/// Composite fan-out over an ordered list of subscribers.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers, preserving order.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Returns `true` if no subscribers are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Delivers `event` to every subscriber in order, awaiting each.
    ///
    /// A panicking subscriber is reported through `tracing` and skipped;
    /// remaining subscribers still receive the event.
    pub async fn emit(&self, event: &GuardEvent) {
        for sub in &self.subs {
            let fut = sub.on_event(event);
            if AssertUnwindSafe(fut).catch_unwind().await.is_err() {
                tracing::error!(
                    subscriber = sub.name(),
                    kind = ?event.kind,
                    "subscriber panicked while handling guard event"
                );
            }
        }
    }
}
