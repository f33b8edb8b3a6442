//! CollectConsumer - records every payload in arrival order

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{Consumer, FeedError, FeedResult, Payload};
use tracing::{debug, trace};

type RejectFn<T> = Arc<dyn Fn(&Payload<T>) -> bool + Send + Sync>;

/// Consumer keeping every payload it accepts
///
/// An optional predicate makes it refuse matching payloads, which are still
/// recorded in [`CollectConsumer::attempts`] but not in
/// [`CollectConsumer::accepted`].
pub struct CollectConsumer<T> {
    name: String,
    attempts: Mutex<Vec<Payload<T>>>,
    accepted: Mutex<Vec<Payload<T>>>,
    reject: Option<RejectFn<T>>,
}

impl<T: Clone> CollectConsumer<T> {
    /// Accept everything
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempts: Mutex::new(Vec::new()),
            accepted: Mutex::new(Vec::new()),
            reject: None,
        }
    }

    /// Refuse payloads matching `predicate`
    pub fn rejecting<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Payload<T>) -> bool + Send + Sync + 'static,
    {
        Self {
            reject: Some(Arc::new(predicate)),
            ..Self::new(name)
        }
    }

    /// Every payload offered, in arrival order
    pub fn attempts(&self) -> Vec<Payload<T>> {
        lock(&self.attempts).clone()
    }

    /// Payloads accepted, in arrival order
    pub fn accepted(&self) -> Vec<Payload<T>> {
        lock(&self.accepted).clone()
    }

    /// Accepted values, flattened
    pub fn values(&self) -> Vec<T> {
        lock(&self.accepted)
            .iter()
            .flat_map(|payload| payload.iter().cloned())
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        lock(&self.attempts).clear();
        lock(&self.accepted).clear();
    }

    fn record(&self, data: Payload<T>) -> FeedResult {
        lock(&self.attempts).push(data.clone());

        if self.reject.as_ref().is_some_and(|reject| reject(&data)) {
            debug!(consumer = %self.name, items = data.len(), "payload refused");
            return Err(FeedError::rejected(&self.name, "payload refused"));
        }

        trace!(consumer = %self.name, items = data.len(), "payload collected");
        lock(&self.accepted).push(data);
        Ok(())
    }
}

impl<T: Clone + Send + 'static> Consumer<T> for CollectConsumer<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn consume(&self, data: Payload<T>) -> FeedResult {
        self.record(data)
    }
}

impl<T> fmt::Debug for CollectConsumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectConsumer")
            .field("name", &self.name)
            .field("attempts", &lock(&self.attempts).len())
            .field("accepted", &lock(&self.accepted).len())
            .finish()
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
