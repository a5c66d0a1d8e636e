//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging custom event
//! handlers into the guard.
//!
//! ## Rules
//! - Events are delivered sequentially, in decision order, on the caller's
//!   execution context — emission is awaited before the verdict is returned.
//! - Panics inside a subscriber are caught and logged; they never poison the
//!   verdict.
//! - A slow subscriber delays the verdict for its caller only; the guard
//!   holds no shared mutable state across invocations.

use async_trait::async_trait;

use crate::events::GuardEvent;

/// Event subscriber for guard observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Keep handling cheap — emission is awaited inline before the verdict
///   returns to the caller.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single decision event.
    ///
    /// Called in decision order for each branch the guard takes. Panics are
    /// caught by the fan-out and reported via `tracing`.
    async fn on_event(&self, event: &GuardEvent);

    /// Returns the subscriber name used in panic reports.
    ///
    /// Prefer short, descriptive names (e.g., "log", "metrics", "audit").
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
