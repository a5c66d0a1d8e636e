//! Verdict events: the guard's observability data model.
//!
//! Every branch of the decision algorithm emits exactly one event describing
//! what was checked and why processing continues or stops. Events are handed
//! to subscribers ([`Subscribe`](crate::Subscribe)); the built-in
//! [`LogWriter`](crate::LogWriter) maps them onto leveled `tracing` output.
//!
//! ## Contents
//! - [`EventKind`], [`GuardEvent`] — event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: [`RedeliveryGuard`](crate::RedeliveryGuard), one event per
//!   decision branch taken.
//! - **Consumers**: anything implementing [`Subscribe`](crate::Subscribe),
//!   fanned out through [`SubscriberSet`](crate::SubscriberSet).

mod event;

pub use event::{EventKind, GuardEvent};
