//! # Integration Tests
//!
//! End-to-end wiring tests across crates.
//!
//! Covers:
//! - Single delivery outcomes (delivered / redirected / failed)
//! - Consumer targets and the stream gate
//! - Silo buffering released by upstream feeders

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use contracts::{ConsumeFn, FeedError, Feeder, Payload, PushStream};

    /// Records the values a feeder saw succeed or fail
    #[derive(Clone, Default)]
    pub struct Outcomes {
        pub success: Arc<Mutex<Vec<u32>>>,
        pub failure: Arc<Mutex<Vec<u32>>>,
    }

    /// Pushes one value on `feeds` and reports the delivery outcome
    pub struct SimpleFeeder {
        value: u32,
        outcomes: Option<Outcomes>,
    }

    impl SimpleFeeder {
        pub fn new(value: u32) -> Self {
            Self {
                value,
                outcomes: None,
            }
        }

        pub fn observed(value: u32, outcomes: &Outcomes) -> Self {
            Self {
                value,
                outcomes: Some(outcomes.clone()),
            }
        }
    }

    impl Feeder<u32> for SimpleFeeder {
        type Stream = PushStream<u32>;

        fn setup_feed(&self, consume: ConsumeFn<u32>) -> PushStream<u32> {
            let stream = PushStream::new();
            let delivery = self.next(Payload::One(self.value), &consume, &stream);
            let value = self.value;
            let outcomes = self.outcomes.clone();
            tokio::spawn(async move {
                let outcome = delivery.await;
                if let Some(outcomes) = outcomes {
                    match outcome {
                        Ok(()) => outcomes.success.lock().unwrap().push(value),
                        Err(_) => outcomes.failure.lock().unwrap().push(value),
                    }
                }
            });
            stream
        }
    }

    pub type Calls = Arc<Mutex<Vec<Payload<u32>>>>;

    /// Consume function recording calls, failing on `reject`
    pub fn recording<F>(reject: F) -> (ConsumeFn<u32>, Calls)
    where
        F: Fn(&Payload<u32>) -> bool + Send + Sync + 'static,
    {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let consume = ConsumeFn::new(move |data: Payload<u32>| {
            let refused = reject(&data);
            sink.lock().unwrap().push(data);
            async move {
                if refused {
                    Err(FeedError::rejected("recording", "refused"))
                } else {
                    Ok(())
                }
            }
        });
        (consume, calls)
    }

    pub async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
mod delivery_tests {
    use std::sync::Arc;

    use consumers::CollectConsumer;
    use contracts::{Feeder, Payload, PushStream};

    use crate::support::{recording, settle, Outcomes, SimpleFeeder};

    #[tokio::test]
    async fn test_feed_reaches_destination() {
        let outcomes = Outcomes::default();
        let (consume, calls) = recording(|_| false);

        SimpleFeeder::observed(99, &outcomes).feeds(consume);
        settle().await;

        assert_eq!(*calls.lock().unwrap(), vec![Payload::One(99)]);
        assert_eq!(*outcomes.success.lock().unwrap(), vec![99]);
        assert!(outcomes.failure.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_redirected_to_handler() {
        let outcomes = Outcomes::default();
        let (consume, _) = recording(|p| *p == Payload::One(2));
        let (handler, handled) = recording(|_| false);

        let ok = SimpleFeeder::new(1);
        ok.feeds(consume.clone());
        ok.feeds(consume.clone());
        SimpleFeeder::observed(2, &outcomes)
            .feeds(consume)
            .throws_to(handler);
        settle().await;

        assert_eq!(*handled.lock().unwrap(), vec![Payload::One(2)]);
        assert_eq!(*outcomes.success.lock().unwrap(), vec![2]);
        assert!(outcomes.failure.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_handler_and_missing_handler_both_reject() {
        let outcomes = Outcomes::default();
        let (consume, _) = recording(|_| true);
        let (handler, handled) = recording(|_| true);
        let (unused, unused_calls) = recording(|_| false);

        SimpleFeeder::observed(4, &outcomes)
            .feeds(consume.clone())
            .throws_to(handler);
        let bare = SimpleFeeder::observed(4, &outcomes).feeds(consume);
        settle().await;

        assert_eq!(handled.lock().unwrap().len(), 1);
        assert!(outcomes.success.lock().unwrap().is_empty());
        assert_eq!(*outcomes.failure.lock().unwrap(), vec![4, 4]);

        // Registering a handler after the failure changes nothing.
        bare.throws_to(unused);
        settle().await;
        assert!(unused_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_consumer_target() {
        let consumer = Arc::new(CollectConsumer::<u32>::new("collector"));

        SimpleFeeder::new(98).feeds(Arc::clone(&consumer));
        settle().await;

        assert_eq!(consumer.accepted(), vec![Payload::One(98)]);
    }

    #[tokio::test]
    async fn test_disabled_stream_skips_destination() {
        let (consume, calls) = recording(|_| true);
        let feeder = SimpleFeeder::new(7);

        let stream = PushStream::new();
        stream.disable();
        feeder.next(Payload::One(7), &consume, &stream).await.unwrap();

        assert!(calls.lock().unwrap().is_empty());
    }
}

#[cfg(test)]
mod silo_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use consumers::{CollectConsumer, LogConsumer};
    use contracts::{Consumer, Feeder, Payload};
    use feeders::{IntervalFeeder, IntervalFeederConfig, IterFeeder};
    use silo::Silo;

    use crate::support::{settle, SimpleFeeder};

    #[tokio::test]
    async fn test_silo_releases_batch_then_empty_batch() {
        let silo = Silo::<u32>::new();
        silo.consume(Payload::One(1)).await.unwrap();
        silo.consume(Payload::One(2)).await.unwrap();

        let downstream = Arc::new(CollectConsumer::<u32>::new("downstream"));
        let trigger = silo.feeds(Arc::clone(&downstream)).trigger::<()>();

        trigger.call(Payload::One(())).await.unwrap();
        trigger.call(Payload::One(())).await.unwrap();

        assert_eq!(
            downstream.accepted(),
            vec![Payload::Batch(vec![1, 2]), Payload::Batch(Vec::new())]
        );
    }

    #[tokio::test]
    async fn test_feeders_fill_silo_and_feeder_pulls_trigger() {
        let silo = Silo::<u32>::named("tank");
        SimpleFeeder::new(10).feeds(&silo);
        IterFeeder::new("readings", vec![11, 12]).feeds(&silo);
        settle().await;
        assert_eq!(silo.len(), 3);

        let downstream = Arc::new(CollectConsumer::<u32>::new("archive"));
        let released = silo.feeds(Arc::clone(&downstream));
        IterFeeder::new("signal", vec!["go"]).feeds(released.trigger::<&str>());
        settle().await;

        assert_eq!(downstream.values(), vec![10, 11, 12]);
        assert!(silo.is_empty());
    }

    #[tokio::test]
    async fn test_failed_flush_reaches_trigger_feeder() {
        let silo = Silo::<u32>::named("lossy");
        silo.consume(Payload::Batch(vec![1, 2, 3])).await.unwrap();

        let broken = Arc::new(CollectConsumer::<u32>::rejecting("broken", |_| true));
        let released = silo.feeds(Arc::clone(&broken));

        let signal = IterFeeder::new("signal", vec![0u8]);
        signal.feeds(released.trigger::<u8>());
        settle().await;

        assert_eq!(signal.stats().failed(), 1);
        assert_eq!(broken.attempts(), vec![Payload::Batch(vec![1, 2, 3])]);
        assert!(silo.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_feeder_drives_silo() {
        let silo = Silo::<u32>::named("periodic");
        let logger = Arc::new(LogConsumer::new("log"));
        let collected = Arc::new(CollectConsumer::<u32>::new("collected"));

        let released = silo.feeds(Arc::clone(&collected));
        released.throws_to(Arc::clone(&logger));

        let clock = IntervalFeeder::new(IntervalFeederConfig {
            name: "clock".to_string(),
            period: Duration::from_millis(50),
            max_pulses: Some(2),
        })
        .unwrap();

        silo.consume(Payload::One(1)).await.unwrap();
        clock.feeds(released.trigger::<u64>());
        settle().await;

        silo.consume(Payload::Batch(vec![2, 3])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(
            collected.accepted(),
            vec![Payload::Batch(vec![1]), Payload::Batch(vec![2, 3])]
        );
        assert_eq!(clock.stats().delivered(), 2);
        assert_eq!(logger.received(), 0);
    }
}
