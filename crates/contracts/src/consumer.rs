//! Consumer trait and Feedable destinations
//!
//! A destination is either a bare [`ConsumeFn`] or a named [`Consumer`]; both
//! resolve to a `ConsumeFn` at the `feeds` call site.

use std::sync::Arc;

use crate::{ConsumeFn, FeedResult, Payload};

/// Addressable data consumer
///
/// Stateful consumers keep their state behind interior mutability, since
/// `consume` only borrows `self`.
#[trait_variant::make(Consumer: Send)]
pub trait LocalConsumer<T> {
    /// Consumer name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Accept one value or a batch of values
    ///
    /// # Errors
    /// Returns a delivery failure when the data is refused
    async fn consume(&self, data: Payload<T>) -> FeedResult;
}

/// Destination accepted by `Feeder::feeds`
pub enum Feedable<T> {
    /// Bare consume function
    Function(ConsumeFn<T>),
    /// Named consumer, already bound to its `consume` operation
    Consumer { name: String, consume: ConsumeFn<T> },
}

impl<T> Feedable<T> {
    /// Bind a consumer's `consume` operation
    pub fn consumer<C>(consumer: Arc<C>) -> Self
    where
        T: Send + 'static,
        C: Consumer<T> + Send + Sync + 'static,
    {
        let name = consumer.name().to_string();
        let consume = ConsumeFn::new(move |data| {
            let consumer = Arc::clone(&consumer);
            async move { consumer.consume(data).await }
        });
        Feedable::Consumer { name, consume }
    }

    /// Consumer name, `None` for bare functions
    pub fn name(&self) -> Option<&str> {
        match self {
            Feedable::Function(_) => None,
            Feedable::Consumer { name, .. } => Some(name),
        }
    }

    /// Resolve to the consume function deliveries go through
    pub fn into_consume_fn(self) -> ConsumeFn<T> {
        match self {
            Feedable::Function(consume) => consume,
            Feedable::Consumer { consume, .. } => consume,
        }
    }
}

impl<T> From<ConsumeFn<T>> for Feedable<T> {
    fn from(consume: ConsumeFn<T>) -> Self {
        Feedable::Function(consume)
    }
}

impl<T> From<&ConsumeFn<T>> for Feedable<T> {
    fn from(consume: &ConsumeFn<T>) -> Self {
        Feedable::Function(consume.clone())
    }
}

impl<T, C> From<Arc<C>> for Feedable<T>
where
    T: Send + 'static,
    C: Consumer<T> + Send + Sync + 'static,
{
    fn from(consumer: Arc<C>) -> Self {
        Feedable::consumer(consumer)
    }
}
