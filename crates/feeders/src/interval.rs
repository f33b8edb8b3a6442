//! IntervalFeeder - periodic pulse source
//!
//! Typically wired to a silo trigger to release it on a fixed cadence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{ConsumeFn, Feeder, Payload, PushStream};
use observability::metrics::{record_delivery, record_pulse};
use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, instrument, trace, warn};

use crate::config::{FeederStats, IntervalFeederConfig};
use crate::error::Result;

/// Feeder pushing an increasing pulse counter (starting at 1) every period
///
/// While a stream is disabled its task parks instead of ticking; the stream's
/// resume callback wakes it up and the next pulse follows one period later.
/// Each `feeds` call starts an independent task on the current Tokio runtime.
pub struct IntervalFeeder {
    config: IntervalFeederConfig,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    stats: Arc<FeederStats>,
}

impl IntervalFeeder {
    /// Create from a validated configuration
    pub fn new(config: IntervalFeederConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
            shutdown: Arc::new(Notify::new()),
            stats: Arc::new(FeederStats::new()),
        })
    }

    /// Pulse every `period` until stopped
    pub fn every(name: impl Into<String>, period: Duration) -> Result<Self> {
        Self::new(IntervalFeederConfig {
            name: name.into(),
            period,
            max_pulses: None,
        })
    }

    /// Feeder name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Shared delivery counters
    pub fn stats(&self) -> &Arc<FeederStats> {
        &self.stats
    }

    /// Stop every task started by this feeder
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    /// Check if the feeder has not been stopped
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Feeder<u64> for IntervalFeeder {
    type Stream = PushStream<u64>;

    #[instrument(
        name = "interval_feeder_setup_feed",
        skip(self, consume),
        fields(feeder = %self.config.name, period_ms = self.config.period.as_millis() as u64)
    )]
    fn setup_feed(&self, consume: ConsumeFn<u64>) -> PushStream<u64> {
        let stream = PushStream::new();
        let wake = Arc::new(Notify::new());
        let waker = Arc::clone(&wake);
        stream.set_resume(move || waker.notify_one());

        let config = self.config.clone();
        let running = Arc::clone(&self.running);
        let shutdown = Arc::clone(&self.shutdown);
        let stats = Arc::clone(&self.stats);
        let task_stream = stream.clone();

        tokio::spawn(async move {
            let mut ticker = interval(config.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut pulse: u64 = 0;

            debug!(feeder = %config.name, "interval feeder started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown.notified() => break,
                }
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                if !task_stream.enabled() {
                    trace!(feeder = %config.name, "stream disabled, parked");
                    tokio::select! {
                        _ = wake.notified() => {}
                        _ = shutdown.notified() => break,
                    }
                    ticker.reset();
                    continue;
                }

                pulse += 1;
                record_pulse(&config.name);
                let outcome = contracts::deliver(Payload::One(pulse), &consume, &task_stream).await;
                record_delivery(&config.name, outcome.is_ok());
                stats.record(&outcome);
                if let Err(e) = outcome {
                    warn!(feeder = %config.name, pulse, error = %e, "pulse not delivered");
                }

                if config.max_pulses.is_some_and(|max| pulse >= max) {
                    break;
                }
            }

            debug!(feeder = %config.name, pulses = pulse, "interval feeder stopped");
        });

        stream
    }
}
