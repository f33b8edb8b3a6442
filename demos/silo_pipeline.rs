//! Silo Pipeline Example
//!
//! Readings are pushed into a silo as they arrive and released in batches by
//! a clock. A second feeder shows failed deliveries being redirected.
//!
//! Run with: cargo run --bin silo_pipeline

use std::sync::{Arc, Mutex};
use std::time::Duration;

use consumers::{CollectConsumer, LogConsumer};
use contracts::{ConsumeFn, Consumer, Feeder, Payload};
use feeders::{IntervalFeeder, IntervalFeederConfig, IterFeeder};
use observability::{FeedMetricsAggregator, LogFormat, ObservabilityConfig};
use silo::Silo;

const PULSES: u64 = 3;
const PERIOD: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Pretty,
        ..Default::default()
    })?;

    tracing::info!("Starting silo pipeline demo");

    // ==== Stage 1: Silo and its downstream ====
    let silo = Silo::<u32>::named("readings");
    let log = Arc::new(LogConsumer::new("batches"));
    let aggregator = Arc::new(Mutex::new(FeedMetricsAggregator::new()));

    let downstream = {
        let log = Arc::clone(&log);
        let aggregator = Arc::clone(&aggregator);
        ConsumeFn::new(move |batch: Payload<u32>| {
            let log = Arc::clone(&log);
            let aggregator = Arc::clone(&aggregator);
            async move {
                let batch_len = batch.len();
                let outcome = log.consume(batch).await;
                if let Ok(mut aggregator) = aggregator.lock() {
                    aggregator.update_flush(batch_len, &outcome);
                }
                outcome
            }
        })
    };
    let released = silo.feeds(downstream);

    // ==== Stage 2: Clock pulling the trigger ====
    let clock = IntervalFeeder::new(IntervalFeederConfig {
        name: "clock".to_string(),
        period: PERIOD,
        max_pulses: Some(PULSES),
    })?;
    clock.feeds(released.trigger::<u64>());

    // ==== Stage 3: Producers filling the silo ====
    let sensors = IterFeeder::new("sensor", (1..=5).collect::<Vec<u32>>());
    sensors.feeds(&silo);
    tokio::time::sleep(PERIOD + PERIOD / 2).await;
    IterFeeder::batch("late_sensor", vec![6u32, 7, 8]).feeds(&silo);

    // ==== Stage 4: Redirect on failure ====
    let picky = Arc::new(CollectConsumer::rejecting("even_only", |p: &Payload<u32>| {
        p.iter().any(|v| v % 2 == 1)
    }));
    let fallback = Arc::new(LogConsumer::new("odd_fallback"));
    let numbers = IterFeeder::new("numbers", vec![2u32, 3, 4, 5]);
    numbers.feeds(Arc::clone(&picky)).throws_to(Arc::clone(&fallback));

    // ==== Stage 5: Wait for the clock to finish ====
    tokio::time::sleep(PERIOD * (PULSES as u32 + 1)).await;
    clock.stop();

    if let Ok(aggregator) = aggregator.lock() {
        tracing::info!("\n{}", aggregator.summary());
    }

    tracing::info!(
        released = log.received(),
        left_in_silo = silo.len(),
        accepted = picky.accepted().len(),
        redirected = fallback.received(),
        failed = numbers.stats().failed(),
        "Silo pipeline demo finished"
    );

    Ok(())
}
