//! Silo - holding tank released by a trigger signal

use std::fmt;
use std::sync::Arc;

use contracts::{
    ConsumeFn, ConsumeFuture, Consumer, FeedResult, Feedable, Feeder, Payload, PushStream,
};
use observability::metrics::{record_silo_depth, record_silo_flush};
use tracing::{debug, instrument, trace, warn};

use crate::store::Store;
use crate::stream::{FlushFn, TriggeredPushStream};

const DEFAULT_NAME: &str = "silo";

/// Buffering feeder and consumer
///
/// Consumes values unconditionally and keeps them in arrival order. Each
/// stream returned by [`Feeder::feeds`] carries a trigger; firing it swaps the
/// buffer for an empty one and delivers the former contents as one batch.
///
/// Clones share the same buffer.
///
/// # Example
///
/// ```ignore
/// let silo = Silo::named("readings");
/// sensor.feeds(&silo);
///
/// let released = silo.feeds(&archive);
/// clock.feeds(released.trigger::<u64>());
/// ```
pub struct Silo<T> {
    name: Arc<str>,
    store: Arc<Store<T>>,
}

impl<T> Silo<T> {
    /// Create an empty silo
    pub fn new() -> Self {
        Self::named(DEFAULT_NAME)
    }

    /// Create an empty silo with a name (used for logging/metrics)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            store: Arc::new(Store::new()),
        }
    }

    /// Silo name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values waiting for the next flush
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Send + 'static> Silo<T> {
    /// Intake endpoint for upstream feeders
    pub fn connector(&self) -> ConsumeFn<T> {
        let name = Arc::clone(&self.name);
        let store = Arc::clone(&self.store);
        ConsumeFn::new(move |data| {
            buffer(&name, &store, data);
            async { Ok(()) }
        })
    }

    fn flush_action(&self, downstream: ConsumeFn<T>, gate: PushStream<T>) -> FlushFn {
        let name = Arc::clone(&self.name);
        let store = Arc::clone(&self.store);

        Arc::new(move || -> ConsumeFuture {
            if !gate.enabled() {
                trace!(silo = %name, "stream disabled, flush skipped");
                return Box::pin(async { Ok(()) });
            }

            // Swap and hand over before the first await: anything consumed
            // from here on belongs to the next flush.
            let batch = store.drain();
            let batch_len = batch.len();
            let delivery = downstream.call(Payload::Batch(batch));
            record_silo_depth(&name, 0);

            let name = Arc::clone(&name);
            Box::pin(async move {
                let outcome = delivery.await;
                record_silo_flush(&name, batch_len, outcome.is_ok());
                match &outcome {
                    Ok(()) => debug!(silo = %name, batch = batch_len, "silo flushed"),
                    Err(e) => warn!(
                        silo = %name,
                        batch = batch_len,
                        error = %e,
                        "silo flush failed, batch dropped"
                    ),
                }
                outcome
            })
        })
    }
}

fn buffer<T>(name: &str, store: &Store<T>, data: Payload<T>) {
    let items = data.len();
    let depth = store.append(data);
    record_silo_depth(name, depth);
    trace!(silo = %name, items, depth, "values buffered");
}

impl<T> Default for Silo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Silo<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> fmt::Debug for Silo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Silo")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Send + 'static> Consumer<T> for Silo<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn consume(&self, data: Payload<T>) -> FeedResult {
        buffer(&self.name, &self.store, data);
        Ok(())
    }
}

impl<T: Send + 'static> Feeder<T> for Silo<T> {
    type Stream = TriggeredPushStream<T>;

    #[instrument(name = "silo_setup_feed", skip(self, consume), fields(silo = %self.name))]
    fn setup_feed(&self, consume: ConsumeFn<T>) -> TriggeredPushStream<T> {
        let stream = PushStream::new();
        let flush = self.flush_action(consume, stream.clone());
        debug!("silo wired to downstream");
        TriggeredPushStream::new(stream, flush)
    }
}

impl<T: Send + 'static> From<&Silo<T>> for Feedable<T> {
    fn from(silo: &Silo<T>) -> Self {
        Feedable::Consumer {
            name: silo.name().to_string(),
            consume: silo.connector(),
        }
    }
}
