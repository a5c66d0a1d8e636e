//! # Event subscribers: the guard's observability collaborators.
//!
//! The guard never talks to a logging framework directly. Each decision
//! branch produces a [`GuardEvent`](crate::GuardEvent) which is fanned out to
//! the subscribers installed at build time. This keeps verdict logic
//! deterministic under test (install a recording subscriber, assert the event
//! stream) while production wiring gets leveled log output through
//! [`LogWriter`].
//!
//! ## Event flow
//! ```text
//! RedeliveryGuard ── emit(GuardEvent) ──► SubscriberSet
//!                                              │ (sequential, awaited)
//!                                         ┌────┴────┬─────────┐
//!                                         ▼         ▼         ▼
//!                                     LogWriter  Metrics   Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use async_trait::async_trait;
//! use redelivery_guard::{GuardEvent, Subscribe};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, event: &GuardEvent) {
//!         if event.kind.is_stop() {
//!             // increment a poison-message counter, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

mod log;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
