//! IterFeeder - pushes a fixed sequence of values

use std::sync::Arc;

use contracts::{ConsumeFn, Feeder, Payload, PushStream};
use observability::metrics::record_delivery;
use tracing::{debug, instrument, warn};

use crate::config::FeederStats;

/// How the sequence is pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterMode {
    /// One delivery per value, each awaited before the next
    Each,
    /// A single batch delivery carrying every value
    Batch,
}

/// Feeder replaying a fixed sequence on every `feeds` call
///
/// Deliveries run on a spawned Tokio task; `feeds` must be called from within
/// a runtime. Values pushed while the stream is disabled are skipped, not
/// queued.
pub struct IterFeeder<T> {
    name: String,
    items: Arc<[T]>,
    mode: IterMode,
    stats: Arc<FeederStats>,
}

impl<T> IterFeeder<T> {
    /// Push every value separately
    pub fn new(name: impl Into<String>, items: impl Into<Vec<T>>) -> Self {
        Self::with_mode(name, items, IterMode::Each)
    }

    /// Push all values as one batch
    pub fn batch(name: impl Into<String>, items: impl Into<Vec<T>>) -> Self {
        Self::with_mode(name, items, IterMode::Batch)
    }

    fn with_mode(name: impl Into<String>, items: impl Into<Vec<T>>, mode: IterMode) -> Self {
        Self {
            name: name.into(),
            items: Arc::from(items.into()),
            mode,
            stats: Arc::new(FeederStats::new()),
        }
    }

    /// Feeder name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared delivery counters
    pub fn stats(&self) -> &Arc<FeederStats> {
        &self.stats
    }
}

impl<T> Feeder<T> for IterFeeder<T>
where
    T: Clone + Send + 'static,
{
    type Stream = PushStream<T>;

    #[instrument(
        name = "iter_feeder_setup_feed",
        skip(self, consume),
        fields(feeder = %self.name, items = self.items.len(), mode = ?self.mode)
    )]
    fn setup_feed(&self, consume: ConsumeFn<T>) -> PushStream<T> {
        let stream = PushStream::new();
        let payloads: Vec<Payload<T>> = match self.mode {
            IterMode::Each => self.items.iter().cloned().map(Payload::One).collect(),
            IterMode::Batch => vec![Payload::Batch(self.items.to_vec())],
        };

        let name = self.name.clone();
        let stats = Arc::clone(&self.stats);
        let task_stream = stream.clone();

        tokio::spawn(async move {
            for payload in payloads {
                let outcome = contracts::deliver(payload, &consume, &task_stream).await;
                record_delivery(&name, outcome.is_ok());
                stats.record(&outcome);
                if let Err(e) = outcome {
                    warn!(feeder = %name, error = %e, "value not delivered");
                }
            }
            debug!(feeder = %name, "sequence exhausted");
        });

        stream
    }
}
