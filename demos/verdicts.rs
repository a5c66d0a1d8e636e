//! # Example: verdicts
//!
//! Runs a batch of simulated deliveries through the guard and prints the
//! verdict for each: fresh, within limits, count-exceeded, TTL-exceeded,
//! and a broken transport read.
//!
//! Demonstrates how to:
//! - Adapt a transport message behind [`InboundMessage`].
//! - Configure the three limits via [`GuardConfig`].
//! - Route decision events to `tracing` through the built-in `LogWriter`.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example verdicts
//! ```

use std::time::Duration;

use redelivery_guard::{
    Clock, GuardConfig, InboundMessage, RedeliveryGuard, SystemClock, TransportError,
};
use tokio_util::sync::CancellationToken;

/// In-memory stand-in for a broker delivery.
struct Delivery {
    id: &'static str,
    redelivered: bool,
    attempts: u32,
    sent_at_ms: i64,
    broken: bool,
}

impl InboundMessage for Delivery {
    fn id(&self) -> Option<String> {
        Some(self.id.to_string())
    }

    fn is_redelivered(&self) -> Result<bool, TransportError> {
        if self.broken {
            return Err(TransportError::property_read(
                "redelivered",
                "session closed",
            ));
        }
        Ok(self.redelivered)
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

    // 1. Limits: 5 redeliveries, 60s TTL, no throttling for this demo
    let guard = RedeliveryGuard::new(GuardConfig {
        max_redelivery_count: 5,
        max_message_ttl: Duration::from_secs(60),
        reception_delay: Duration::ZERO,
    });

    let now = SystemClock.now_ms();
    let deliveries = [
        Delivery {
            id: "fresh",
            redelivered: false,
            attempts: 0,
            sent_at_ms: now,
            broken: false,
        },
        Delivery {
            id: "retried-twice",
            redelivered: true,
            attempts: 2,
            sent_at_ms: now,
            broken: false,
        },
        Delivery {
            id: "poison",
            redelivered: true,
            attempts: 6,
            sent_at_ms: now,
            broken: false,
        },
        Delivery {
            id: "stale",
            redelivered: true,
            attempts: 2,
            sent_at_ms: now - 120_000,
            broken: false,
        },
        Delivery {
            id: "unreadable",
            redelivered: true,
            attempts: 1,
            sent_at_ms: now,
            broken: true,
        },
    ];

    // 2. Decide each delivery the way a consumer loop would
    let ctx = CancellationToken::new();
    for delivery in &deliveries {
        let stop = guard.should_stop(Some(delivery), &ctx).await;
        let outcome = if stop { "STOP" } else { "process" };
        println!("[{}] -> {outcome}", delivery.id);
    }
}
