use std::sync::Arc;

use crate::{
    config::GuardConfig,
    subscribers::{Subscribe, SubscriberSet},
    time::{Clock, Sleep, SystemClock, TokioSleep},
};

use super::core::RedeliveryGuard;

/// Builder for constructing a [`RedeliveryGuard`] with optional collaborators.
///
/// Defaults: [`SystemClock`], [`TokioSleep`], no subscribers. Tests swap in
/// manual clocks, recording sleeps, and recording subscribers to observe the
/// decision stream without real time passing.
pub struct GuardBuilder {
    config: GuardConfig,
    clock: Arc<dyn Clock>,
    sleep: Arc<dyn Sleep>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GuardBuilder {
    /// Creates a new builder with the given configuration and default
    /// collaborators.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            sleep: Arc::new(TokioSleep),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the set of event subscribers.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends a single event subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Replaces the wall-clock source used by the TTL check.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the sleep capability used by the reception throttle.
    pub fn with_sleep(mut self, sleep: Arc<dyn Sleep>) -> Self {
        self.sleep = sleep;
        self
    }

    /// Builds and returns the guard.
    pub fn build(self) -> RedeliveryGuard {
        RedeliveryGuard::new_internal(
            self.config,
            self.clock,
            self.sleep,
            SubscriberSet::new(self.subscribers),
        )
    }
}
