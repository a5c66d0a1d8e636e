//! # redelivery-guard
//!
//! **redelivery-guard** is a poison-message decision gate for broker
//! consumers.
//!
//! A message that keeps failing is redelivered by the broker again and again,
//! burning resources and repeating side effects forever. This crate provides
//! the missing decision in that loop: before a consumer processes a
//! redelivered message, it asks the guard whether processing should stop.
//! The guard checks the message against three configurable limits and
//! optionally throttles redelivered messages to slow a hot retry loop down.
//! It never receives, acknowledges, or rejects messages itself — those
//! mechanics stay with the caller.
//!
//! ## Architecture
//! ```text
//!     broker ──► consumer ──► RedeliveryGuard::should_stop(message, ctx)
//!                   │              │
//!                   │              ├─ absent?          → stop
//!                   │              ├─ fresh delivery?  → proceed
//!                   │              ├─ count > limit?   → stop
//!                   │              ├─ lifespan > TTL?  → stop
//!                   │              ├─ throttle delay   (interruptible)
//!                   │              └─ otherwise        → proceed
//!                   │
//!                   └─ true  → discard / dead-letter (caller's ack policy)
//!                      false → process normally
//!
//! every branch ──► GuardEvent ──► SubscriberSet ──► LogWriter / custom subs
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                    |
//! |-------------------|----------------------------------------------------------------------|---------------------------------------|
//! | **Decisions**     | Fixed-order checks with a fail-closed verdict.                       | [`RedeliveryGuard`], [`GuardBuilder`] |
//! | **Configuration** | Three limits; zero disables each check.                              | [`GuardConfig`]                       |
//! | **Messages**      | Narrow capability surface over any transport's message.              | [`InboundMessage`], [`TransportError`]|
//! | **Observability** | One event per decision branch, fanned out to subscribers.            | [`GuardEvent`], [`Subscribe`]         |
//! | **Time**          | Injectable clock and sleep for deterministic tests.                  | [`Clock`], [`Sleep`]                  |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use redelivery_guard::{
//!     Clock, GuardConfig, InboundMessage, RedeliveryGuard, SystemClock, TransportError,
//! };
//!
//! struct Delivery {
//!     redelivered: bool,
//!     attempts: u32,
//!     sent_at_ms: i64,
//! }
//!
//! impl InboundMessage for Delivery {
//!     fn id(&self) -> Option<String> {
//!         Some("demo-1".to_string())
//!     }
//!     fn is_redelivered(&self) -> Result<bool, TransportError> {
//!         Ok(self.redelivered)
//!     }
//!     fn redelivery_count(&self) -> Result<u32, TransportError> {
//!         Ok(self.attempts)
//!     }
//!     fn sent_at_ms(&self) -> Result<i64, TransportError> {
//!         Ok(self.sent_at_ms)
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let guard = RedeliveryGuard::new(GuardConfig {
//!         max_redelivery_count: 5,
//!         max_message_ttl: Duration::from_secs(60),
//!         reception_delay: Duration::ZERO,
//!     });
//!     let ctx = CancellationToken::new();
//!
//!     let fresh = Delivery {
//!         redelivered: false,
//!         attempts: 0,
//!         sent_at_ms: SystemClock.now_ms(),
//!     };
//!     assert!(!guard.should_stop(Some(&fresh), &ctx).await);
//!
//!     let poison = Delivery {
//!         redelivered: true,
//!         attempts: 6,
//!         sent_at_ms: SystemClock.now_ms(),
//!     };
//!     assert!(guard.should_stop(Some(&poison), &ctx).await);
//! }
//! ```

mod config;
mod error;
mod events;
mod guard;
mod message;
mod subscribers;
mod time;

// ---- Public re-exports ----

pub use config::GuardConfig;
pub use error::TransportError;
pub use events::{EventKind, GuardEvent};
pub use guard::{GuardBuilder, RedeliveryGuard};
pub use message::InboundMessage;
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use time::{Clock, Sleep, SystemClock, TokioSleep};
