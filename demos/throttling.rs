//! # Example: throttling
//!
//! Shows the reception throttle in action: redelivered messages are delayed
//! by the configured reception delay before the verdict is returned, and an
//! external cancellation cuts the wait short without changing the verdict.
//!
//! ## Flow
//! ```text
//! should_stop(redelivered msg)
//!     ├─► checks pass
//!     ├─► ThrottleScheduled (1s)
//!     │     ├─ run 1: wait completes      → verdict false after ~1s
//!     │     └─ run 2: ctx cancelled early → ThrottleInterrupted,
//!     │                                     verdict still false
//!     └─► proceed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example throttling
//! ```

use std::time::{Duration, Instant};

use redelivery_guard::{
    Clock, GuardConfig, InboundMessage, RedeliveryGuard, SystemClock, TransportError,
};
use tokio_util::sync::CancellationToken;

struct Delivery {
    attempts: u32,
    sent_at_ms: i64,
}

impl InboundMessage for Delivery {
    fn id(&self) -> Option<String> {
        Some("throttled-1".to_string())
    }

    fn is_redelivered(&self) -> Result<bool, TransportError> {
        Ok(true)
    }

    fn redelivery_count(&self) -> Result<u32, TransportError> {
        Ok(self.attempts)
    }

    fn sent_at_ms(&self) -> Result<i64, TransportError> {
        Ok(self.sent_at_ms)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let guard = RedeliveryGuard::new(GuardConfig {
        max_redelivery_count: 10,
        max_message_ttl: Duration::from_secs(60),
        reception_delay: Duration::from_secs(1),
    });

    let msg = Delivery {
        attempts: 3,
        sent_at_ms: SystemClock.now_ms(),
    };

    // Run 1: the full delay is waited out
    let started = Instant::now();
    let stop = guard.should_stop(Some(&msg), &CancellationToken::new()).await;
    println!(
        "full throttle: verdict={stop} elapsed={:?}",
        started.elapsed()
    );

    // Run 2: cancel mid-wait; the interruption is swallowed
    let ctx = CancellationToken::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let stop = guard.should_stop(Some(&msg), &ctx).await;
    println!(
        "interrupted throttle: verdict={stop} elapsed={:?}",
        started.elapsed()
    );
}
