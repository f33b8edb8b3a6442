//! LogConsumer - logs payload summaries via tracing

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{Consumer, FeedResult, Payload};
use tracing::{info, instrument};

/// Consumer that logs every payload it receives
#[derive(Debug)]
pub struct LogConsumer {
    name: String,
    received: AtomicU64,
}

impl LogConsumer {
    /// Create a new LogConsumer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            received: AtomicU64::new(0),
        }
    }

    /// Number of values logged so far
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    fn log_payload<T: Debug>(&self, data: &Payload<T>) {
        let items = data.len() as u64;
        let total = self.received.fetch_add(items, Ordering::Relaxed) + items;

        info!(
            consumer = %self.name,
            batch = data.is_batch(),
            items = data.len(),
            total,
            payload = ?data,
            "payload received"
        );
    }
}

impl<T: Debug + Send + 'static> Consumer<T> for LogConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_consumer_consume",
        skip(self, data),
        fields(consumer = %self.name, items = data.len())
    )]
    async fn consume(&self, data: Payload<T>) -> FeedResult {
        self.log_payload(&data);
        Ok(())
    }
}
