//! # The redelivery guard: poison-message decision gate.
//!
//! One operation: "should processing of this message stop?". The guard runs
//! four checks in a fixed order, each able to short-circuit to a stop
//! verdict, then optionally throttles before releasing the message.
//!
//! ## Decision flow
//! ```text
//! should_stop(message, ctx)
//!   │
//!   ├─► message absent? ──────────────► emit MessageAbsent, STOP
//!   │
//!   ├─► is_redelivered()? ── false ──► emit FreshDelivery, PROCEED
//!   │                                  (no TTL check, no throttle)
//!   ├─► redelivery_count()
//!   │
//!   ├─► limit enabled && count > limit ─► emit RedeliveryExceeded, STOP
//!   │
//!   ├─► ttl enabled && lifespan > ttl ──► emit LifespanExceeded, STOP
//!   │
//!   ├─► throttle:
//!   │     delay > 0 ─► emit ThrottleScheduled ─► sleep(delay)
//!   │     │                 └─ interrupted? ──► emit ThrottleInterrupted,
//!   │     │                                    swallowed, verdict unchanged
//!   │     delay = 0 ─► emit ThrottleSkipped
//!   │
//!   └─► PROCEED
//!
//! any transport read failure along the way:
//!   ──► emit TransportFailed, STOP  (fail closed, nothing propagates)
//! ```
//!
//! ## Rules
//! - Verdict `true` means the caller must not process the message further;
//!   acknowledgement policy stays with the caller.
//! - The guard never returns an error and holds no per-message state across
//!   calls — each invocation is a pure function of (message, current time,
//!   configuration) plus the throttle side effect.
//! - Concurrent invocations over different messages share no mutable state.

mod builder;
mod core;

pub use builder::GuardBuilder;
pub use core::RedeliveryGuard;
