//! # Decide whether processing of an inbound message must stop.
//!
//! [`RedeliveryGuard::should_stop`] runs the checks in a fixed order:
//! absent-message, redelivered-flag, redelivery-count, TTL, then the
//! reception throttle. Every branch emits one
//! [`GuardEvent`]; every transport read failure is converted into a stop
//! verdict at a single recovery point.

use std::sync::Arc;

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{
    config::GuardConfig,
    error::TransportError,
    events::{EventKind, GuardEvent},
    message::InboundMessage,
    subscribers::{LogWriter, SubscriberSet},
    time::{Clock, Sleep},
};

/// Decision gate protecting a consumer from poison messages.
///
/// Parameterized at construction by [`GuardConfig`]; holds no other state.
/// Safe to share across concurrent callers — decisions read only the message
/// and the clock.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use redelivery_guard::{GuardConfig, RedeliveryGuard};
///
/// # async fn consume(message: &dyn redelivery_guard::InboundMessage) {
/// let guard = RedeliveryGuard::new(GuardConfig {
///     max_redelivery_count: 10,
///     max_message_ttl: Duration::from_secs(10),
///     reception_delay: Duration::from_secs(1),
/// });
///
/// let ctx = CancellationToken::new();
/// if guard.should_stop(Some(message), &ctx).await {
///     // discard / dead-letter per the caller's acknowledgement policy
///     return;
/// }
/// // normal processing
/// # }
/// ```
pub struct RedeliveryGuard {
    config: GuardConfig,
    clock: Arc<dyn Clock>,
    sleep: Arc<dyn Sleep>,
    subscribers: SubscriberSet,
}

impl RedeliveryGuard {
    /// Creates a guard with production wiring: system clock, tokio sleep,
    /// and the built-in [`LogWriter`] subscriber.
    pub fn new(config: GuardConfig) -> Self {
        Self::builder(config)
            .with_subscriber(Arc::new(LogWriter))
            .build()
    }

    /// Returns a builder for customizing collaborators.
    pub fn builder(config: GuardConfig) -> super::GuardBuilder {
        super::GuardBuilder::new(config)
    }

    /// Returns the configuration the guard was built with.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub(super) fn new_internal(
        config: GuardConfig,
        clock: Arc<dyn Clock>,
        sleep: Arc<dyn Sleep>,
        subscribers: SubscriberSet,
    ) -> Self {
        Self {
            config,
            clock,
            sleep,
            subscribers,
        }
    }

    /// Returns `true` if the caller must not process `message` any further.
    ///
    /// `false` clears the message for normal processing, possibly after the
    /// configured reception delay has been waited out. Cancelling `ctx`
    /// interrupts only the throttling wait; the interruption is swallowed and
    /// never changes the verdict.
    ///
    /// This method is infallible by contract: malformed input and transport
    /// read failures all collapse into a `true` verdict, because letting an
    /// uninspectable message continue risks the endless redelivery loop the
    /// guard exists to break.
    pub async fn should_stop(
        &self,
        message: Option<&dyn InboundMessage>,
        ctx: &CancellationToken,
    ) -> bool {
        let Some(message) = message else {
            self.emit(
                GuardEvent::new(EventKind::MessageAbsent)
                    .with_reason("message reference absent, check the consuming side for errors"),
            )
            .await;
            return true;
        };

        match self.inspect(message, ctx).await {
            Ok(stop) => stop,
            Err(err) => {
                self.emit(
                    GuardEvent::new(EventKind::TransportFailed)
                        .with_message_id_opt(message.id())
                        .with_reason(err.as_message()),
                )
                .await;
                true
            }
        }
    }

    /// Runs the redelivered-message checks; any `Err` means a transport read
    /// failed and the caller fails closed.
    async fn inspect(
        &self,
        message: &dyn InboundMessage,
        ctx: &CancellationToken,
    ) -> Result<bool, TransportError> {
        if !message.is_redelivered()? {
            self.emit(GuardEvent::new(EventKind::FreshDelivery).with_message_id_opt(message.id()))
                .await;
            return Ok(false);
        }

        // Read up front: the throttle reports the count even when the
        // redelivery-count limit itself is disabled.
        let count = message.redelivery_count()?;

        if self.config.redelivery_limit_enabled() && self.redelivery_exceeded(message, count).await
        {
            return Ok(true);
        }

        if self.config.ttl_enabled() && self.lifespan_exceeded(message).await? {
            return Ok(true);
        }

        self.throttle(message, count, ctx).await;

        Ok(false)
    }

    /// Compares the observed redelivery count against the configured limit.
    ///
    /// The boundary is exclusive: `count == limit` still passes.
    async fn redelivery_exceeded(&self, message: &dyn InboundMessage, count: u32) -> bool {
        let limit = self.config.max_redelivery_count;

        if count > limit {
            self.emit(
                GuardEvent::new(EventKind::RedeliveryExceeded)
                    .with_message_id_opt(message.id())
                    .with_redelivery_count(count)
                    .with_limit(limit)
                    .with_details(message.details()),
            )
            .await;
            return true;
        }

        self.emit(
            GuardEvent::new(EventKind::RedeliveryAccepted)
                .with_message_id_opt(message.id())
                .with_redelivery_count(count)
                .with_limit(limit),
        )
        .await;
        false
    }

    /// Compares the message lifespan (current time minus broker timestamp)
    /// against the configured TTL.
    async fn lifespan_exceeded(
        &self,
        message: &dyn InboundMessage,
    ) -> Result<bool, TransportError> {
        let lifespan_ms = self.clock.now_ms().saturating_sub(message.sent_at_ms()?);
        let ttl = self.config.max_message_ttl;
        let ttl_ms = ttl.as_millis().min(i64::MAX as u128) as i64;

        if lifespan_ms > ttl_ms {
            self.emit(
                GuardEvent::new(EventKind::LifespanExceeded)
                    .with_message_id_opt(message.id())
                    .with_lifespan_ms(lifespan_ms)
                    .with_max_ttl(ttl)
                    .with_details(message.details()),
            )
            .await;
            return Ok(true);
        }

        self.emit(
            GuardEvent::new(EventKind::LifespanAccepted)
                .with_message_id_opt(message.id())
                .with_lifespan_ms(lifespan_ms)
                .with_max_ttl(ttl),
        )
        .await;
        Ok(false)
    }

    /// Delays the caller by the configured reception delay.
    ///
    /// Never affects the verdict. Cancelling `ctx` cuts the wait short; the
    /// interruption is reported and swallowed.
    async fn throttle(&self, message: &dyn InboundMessage, count: u32, ctx: &CancellationToken) {
        if !self.config.throttling_enabled() {
            self.emit(
                GuardEvent::new(EventKind::ThrottleSkipped)
                    .with_message_id_opt(message.id())
                    .with_redelivery_count(count),
            )
            .await;
            return;
        }

        let delay = self.config.reception_delay;
        self.emit(
            GuardEvent::new(EventKind::ThrottleScheduled)
                .with_message_id_opt(message.id())
                .with_redelivery_count(count)
                .with_delay(delay),
        )
        .await;

        select! {
            _ = self.sleep.sleep(delay) => {}
            _ = ctx.cancelled() => {
                self.emit(
                    GuardEvent::new(EventKind::ThrottleInterrupted)
                        .with_message_id_opt(message.id()),
                )
                .await;
            }
        }
    }

    async fn emit(&self, event: GuardEvent) {
        self.subscribers.emit(&event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::Subscribe;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    const MAX_REDELIVERY_10_TIMES: u32 = 10;
    const MAX_TTL_10_SECONDS: Duration = Duration::from_secs(10);
    const THROTTLE_DELAY_ONE_SECOND: Duration = Duration::from_secs(1);

    /// Fixed "now" for the manual clock; fakes default their broker
    /// timestamp to it so messages are fresh unless a test says otherwise.
    const NOW_MS: i64 = 1_700_000_000_000;

    #[derive(Clone, Copy)]
    enum FailingRead {
        Redelivered,
        Count,
        Timestamp,
    }

    struct FakeMessage {
        id: Option<String>,
        redelivered: bool,
        redelivery_count: u32,
        sent_at_ms: i64,
        failing: Option<FailingRead>,
    }

    impl FakeMessage {
        fn builder() -> FakeMessageBuilder {
            FakeMessageBuilder {
                id: Some("some-message-id".to_string()),
                redelivery_count: None,
                sent_at_ms: NOW_MS,
                failing: None,
            }
        }
    }

    struct FakeMessageBuilder {
        id: Option<String>,
        redelivery_count: Option<u32>,
        sent_at_ms: i64,
        failing: Option<FailingRead>,
    }

    impl FakeMessageBuilder {
        /// A count of `None` or `0` builds a fresh (not redelivered) message,
        /// anything else a redelivered one.
        fn redelivery_count(mut self, count: u32) -> Self {
            self.redelivery_count = Some(count);
            self
        }

        fn sent_at_ms(mut self, sent_at_ms: i64) -> Self {
            self.sent_at_ms = sent_at_ms;
            self
        }

        fn failing(mut self, read: FailingRead) -> Self {
            self.failing = Some(read);
            self
        }

        fn build(self) -> FakeMessage {
            let count = self.redelivery_count.unwrap_or(0);
            FakeMessage {
                id: self.id,
                redelivered: count > 0,
                redelivery_count: count,
                sent_at_ms: self.sent_at_ms,
                failing: self.failing,
            }
        }
    }

    impl InboundMessage for FakeMessage {
        fn id(&self) -> Option<String> {
            self.id.clone()
        }

        fn is_redelivered(&self) -> Result<bool, TransportError> {
            if matches!(self.failing, Some(FailingRead::Redelivered)) {
                return Err(TransportError::property_read("redelivered", "injected"));
            }
            Ok(self.redelivered)
        }

        fn redelivery_count(&self) -> Result<u32, TransportError> {
            if matches!(self.failing, Some(FailingRead::Count)) {
                return Err(TransportError::property_read("redelivery_count", "injected"));
            }
            Ok(self.redelivery_count)
        }

        fn sent_at_ms(&self) -> Result<i64, TransportError> {
            if matches!(self.failing, Some(FailingRead::Timestamp)) {
                return Err(TransportError::property_read("timestamp", "injected"));
            }
            Ok(self.sent_at_ms)
        }
    }

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<GuardEvent>>,
    }

    impl Recording {
        fn kinds(&self) -> Vec<EventKind> {
            self.events.lock().unwrap().iter().map(|e| e.kind).collect()
        }

        fn find(&self, kind: EventKind) -> GuardEvent {
            self.events
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.kind == kind)
                .cloned()
                .unwrap_or_else(|| panic!("no {kind:?} event emitted"))
        }
    }

    #[async_trait]
    impl Subscribe for Recording {
        async fn on_event(&self, event: &GuardEvent) {
            self.events.lock().unwrap().push(event.clone());
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct ManualClock(i64);

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    /// Records requested durations and returns immediately.
    #[derive(Default)]
    struct RecordingSleep {
        slept: Mutex<Vec<Duration>>,
    }

    impl RecordingSleep {
        fn slept(&self) -> Vec<Duration> {
            self.slept.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleep for RecordingSleep {
        async fn sleep(&self, delay: Duration) {
            self.slept.lock().unwrap().push(delay);
        }
    }

    /// Never completes; forces the cancellation branch of the throttle.
    struct NeverSleep;

    #[async_trait]
    impl Sleep for NeverSleep {
        async fn sleep(&self, _delay: Duration) {
            std::future::pending::<()>().await;
        }
    }

    fn default_config() -> GuardConfig {
        GuardConfig {
            max_redelivery_count: MAX_REDELIVERY_10_TIMES,
            max_message_ttl: MAX_TTL_10_SECONDS,
            reception_delay: THROTTLE_DELAY_ONE_SECOND,
        }
    }

    fn guard_with(config: GuardConfig) -> (RedeliveryGuard, Arc<Recording>, Arc<RecordingSleep>) {
        let recording = Arc::new(Recording::default());
        let sleep = Arc::new(RecordingSleep::default());
        let guard = RedeliveryGuard::builder(config)
            .with_clock(Arc::new(ManualClock(NOW_MS)))
            .with_sleep(sleep.clone())
            .with_subscribers(vec![recording.clone() as _])
            .build();
        (guard, recording, sleep)
    }

    async fn verdict(guard: &RedeliveryGuard, message: &FakeMessage) -> bool {
        guard
            .should_stop(Some(message), &CancellationToken::new())
            .await
    }

    #[tokio::test]
    async fn stops_when_message_absent() {
        let (guard, recording, sleep) = guard_with(default_config());

        let stop = guard.should_stop(None, &CancellationToken::new()).await;

        // Absent input must stop processing without raising anything to the
        // caller; the consuming side is relying on the verdict alone.
        assert!(stop);
        assert_eq!(recording.kinds(), vec![EventKind::MessageAbsent]);
        assert!(sleep.slept().is_empty());
    }

    #[tokio::test]
    async fn allows_fresh_message_without_checks_or_throttle() {
        let (guard, recording, sleep) = guard_with(default_config());
        // Ancient timestamp on purpose: the TTL check must never run for a
        // message that was not redelivered.
        let msg = FakeMessage::builder().sent_at_ms(1).build();

        assert!(!verdict(&guard, &msg).await);
        assert_eq!(recording.kinds(), vec![EventKind::FreshDelivery]);
        assert!(sleep.slept().is_empty());
    }

    #[tokio::test]
    async fn allows_redelivery_count_equal_to_limit() {
        let (guard, _, _) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .redelivery_count(MAX_REDELIVERY_10_TIMES)
            .build();

        assert!(!verdict(&guard, &msg).await);
    }

    #[tokio::test]
    async fn stops_when_redelivery_count_exceeds_limit() {
        let (guard, recording, sleep) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .redelivery_count(MAX_REDELIVERY_10_TIMES + 1)
            .build();

        assert!(verdict(&guard, &msg).await);
        assert_eq!(recording.kinds(), vec![EventKind::RedeliveryExceeded]);
        assert!(sleep.slept().is_empty());

        let ev = recording.find(EventKind::RedeliveryExceeded);
        assert_eq!(ev.message_id.as_deref(), Some("some-message-id"));
        assert_eq!(ev.redelivery_count, Some(11));
        assert_eq!(ev.limit, Some(10));
        assert!(ev.details.is_some(), "diagnostic dump missing");
    }

    #[tokio::test]
    async fn ignores_redelivery_count_when_limit_disabled() {
        let (guard, recording, _) = guard_with(GuardConfig {
            max_redelivery_count: 0,
            ..default_config()
        });
        let msg = FakeMessage::builder().redelivery_count(100).build();

        assert!(!verdict(&guard, &msg).await);
        // Disabled check is skipped entirely: no accepted event either.
        assert_eq!(
            recording.kinds(),
            vec![EventKind::LifespanAccepted, EventKind::ThrottleScheduled]
        );
    }

    #[tokio::test]
    async fn ignores_lifespan_when_ttl_disabled() {
        let (guard, recording, _) = guard_with(GuardConfig {
            max_message_ttl: Duration::ZERO,
            ..default_config()
        });
        let msg = FakeMessage::builder()
            .redelivery_count(2)
            .sent_at_ms(1)
            .build();

        assert!(!verdict(&guard, &msg).await);
        assert_eq!(
            recording.kinds(),
            vec![EventKind::RedeliveryAccepted, EventKind::ThrottleScheduled]
        );
    }

    #[tokio::test]
    async fn allows_when_both_limits_disabled() {
        let (guard, recording, _) = guard_with(GuardConfig {
            max_redelivery_count: 0,
            max_message_ttl: Duration::ZERO,
            reception_delay: THROTTLE_DELAY_ONE_SECOND,
        });
        let msg = FakeMessage::builder()
            .redelivery_count(u32::MAX)
            .sent_at_ms(1)
            .build();

        assert!(!verdict(&guard, &msg).await);
        assert_eq!(recording.kinds(), vec![EventKind::ThrottleScheduled]);
    }

    #[tokio::test]
    async fn allows_when_neither_limit_exceeded() {
        let (guard, _, _) = guard_with(default_config());
        let msg = FakeMessage::builder().redelivery_count(2).build();

        assert!(!verdict(&guard, &msg).await);
    }

    #[tokio::test]
    async fn stops_when_lifespan_exceeds_ttl() {
        let (guard, recording, _) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .redelivery_count(2)
            .sent_at_ms(1)
            .build();

        assert!(verdict(&guard, &msg).await);
        assert_eq!(
            recording.kinds(),
            vec![EventKind::RedeliveryAccepted, EventKind::LifespanExceeded]
        );

        let ev = recording.find(EventKind::LifespanExceeded);
        assert_eq!(ev.lifespan_ms, Some(NOW_MS - 1));
        assert_eq!(ev.max_ttl_ms, Some(10_000));
    }

    #[tokio::test]
    async fn allows_lifespan_exactly_equal_to_ttl() {
        let (guard, _, _) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .redelivery_count(2)
            .sent_at_ms(NOW_MS - 10_000)
            .build();

        // Strict comparison: a lifespan of exactly the TTL still passes.
        assert!(!verdict(&guard, &msg).await);
    }

    #[tokio::test]
    async fn throttles_redelivered_message_with_configured_delay() {
        let (guard, recording, sleep) = guard_with(default_config());
        let msg = FakeMessage::builder().redelivery_count(2).build();

        assert!(!verdict(&guard, &msg).await);
        assert_eq!(sleep.slept(), vec![THROTTLE_DELAY_ONE_SECOND]);

        let ev = recording.find(EventKind::ThrottleScheduled);
        assert_eq!(ev.delay_ms, Some(1_000));
        assert_eq!(ev.redelivery_count, Some(2));
    }

    #[tokio::test]
    async fn skips_throttle_when_no_delay_configured() {
        let (guard, recording, sleep) = guard_with(GuardConfig {
            reception_delay: Duration::ZERO,
            ..default_config()
        });
        let msg = FakeMessage::builder().redelivery_count(2).build();

        assert!(!verdict(&guard, &msg).await);
        assert!(sleep.slept().is_empty());
        assert_eq!(
            recording.kinds(),
            vec![
                EventKind::RedeliveryAccepted,
                EventKind::LifespanAccepted,
                EventKind::ThrottleSkipped
            ]
        );
    }

    #[tokio::test]
    async fn swallows_interrupted_throttle() {
        let recording = Arc::new(Recording::default());
        let guard = RedeliveryGuard::builder(default_config())
            .with_clock(Arc::new(ManualClock(NOW_MS)))
            .with_sleep(Arc::new(NeverSleep))
            .with_subscribers(vec![recording.clone() as _])
            .build();
        let msg = FakeMessage::builder().redelivery_count(2).build();

        let ctx = CancellationToken::new();
        ctx.cancel();
        let stop = guard.should_stop(Some(&msg), &ctx).await;

        // Interruption cuts the wait short but never flips the verdict.
        assert!(!stop);
        assert_eq!(
            recording.kinds(),
            vec![
                EventKind::RedeliveryAccepted,
                EventKind::LifespanAccepted,
                EventKind::ThrottleScheduled,
                EventKind::ThrottleInterrupted
            ]
        );
    }

    #[tokio::test]
    async fn stops_on_redelivered_flag_read_failure() {
        let (guard, recording, _) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .failing(FailingRead::Redelivered)
            .build();

        assert!(verdict(&guard, &msg).await);
        assert_eq!(recording.kinds(), vec![EventKind::TransportFailed]);

        let ev = recording.find(EventKind::TransportFailed);
        let reason = ev.reason.as_deref().unwrap_or_default();
        assert!(reason.contains("redelivered"), "got reason: {reason}");
    }

    #[tokio::test]
    async fn stops_on_redelivery_count_read_failure() {
        let (guard, recording, _) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .redelivery_count(2)
            .failing(FailingRead::Count)
            .build();

        assert!(verdict(&guard, &msg).await);
        assert_eq!(recording.kinds(), vec![EventKind::TransportFailed]);
    }

    #[tokio::test]
    async fn stops_on_timestamp_read_failure() {
        let (guard, recording, _) = guard_with(default_config());
        let msg = FakeMessage::builder()
            .redelivery_count(2)
            .failing(FailingRead::Timestamp)
            .build();

        assert!(verdict(&guard, &msg).await);
        assert_eq!(
            recording.kinds(),
            vec![EventKind::RedeliveryAccepted, EventKind::TransportFailed]
        );
    }

    #[tokio::test]
    async fn ignores_timestamp_read_failure_when_ttl_disabled() {
        // The broker timestamp is only read by the TTL check; with the check
        // disabled a broken timestamp property must not matter.
        let (guard, _, _) = guard_with(GuardConfig {
            max_message_ttl: Duration::ZERO,
            ..default_config()
        });
        let msg = FakeMessage::builder()
            .redelivery_count(2)
            .failing(FailingRead::Timestamp)
            .build();

        assert!(!verdict(&guard, &msg).await);
    }

    #[tokio::test]
    async fn concurrent_invocations_are_independent() {
        let (guard, _, _) = guard_with(default_config());
        let guard = Arc::new(guard);

        let fresh = FakeMessage::builder().build();
        let poison = FakeMessage::builder()
            .redelivery_count(MAX_REDELIVERY_10_TIMES + 1)
            .build();

        let (a, b) = tokio::join!(verdict(&guard, &fresh), verdict(&guard, &poison));
        assert!(!a);
        assert!(b);
    }

    #[tokio::test]
    async fn default_wiring_smoke() {
        let guard = RedeliveryGuard::new(GuardConfig::default());
        let msg = FakeMessage::builder().build();

        assert!(!verdict(&guard, &msg).await);
        assert_eq!(guard.config().max_redelivery_count, 0);
    }
}
