//! TriggeredPushStream - push stream released by an external signal

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use contracts::{ConsumeFn, ConsumeFuture, Payload, PushStream};

pub(crate) type FlushFn = Arc<dyn Fn() -> ConsumeFuture + Send + Sync>;

/// Connection handle returned by `Silo::feeds`
///
/// Dereferences to the underlying [`PushStream`], so `enabled`, `set_resume`
/// and `throws_to` are available directly. The error handler is never used by
/// the flush path: a failed flush is returned to whoever fired the trigger.
pub struct TriggeredPushStream<T> {
    stream: PushStream<T>,
    flush: FlushFn,
}

impl<T> TriggeredPushStream<T> {
    pub(crate) fn new(stream: PushStream<T>, flush: FlushFn) -> Self {
        Self { stream, flush }
    }

    /// Release endpoint accepting signals of any type
    ///
    /// The signal payload is discarded; every invocation drains the silo and
    /// resolves with the downstream delivery outcome.
    ///
    /// ```ignore
    /// let released = silo.feeds(&downstream);
    /// ticker.feeds(released.trigger::<u64>());
    /// ```
    pub fn trigger<S: 'static>(&self) -> ConsumeFn<S> {
        let flush = Arc::clone(&self.flush);
        ConsumeFn::new(move |_signal: Payload<S>| flush())
    }

    /// Fire the trigger directly
    pub fn flush(&self) -> ConsumeFuture {
        (self.flush)()
    }

    /// Underlying push stream
    pub fn stream(&self) -> &PushStream<T> {
        &self.stream
    }
}

impl<T> Deref for TriggeredPushStream<T> {
    type Target = PushStream<T>;

    fn deref(&self) -> &PushStream<T> {
        &self.stream
    }
}

impl<T> Clone for TriggeredPushStream<T> {
    fn clone(&self) -> Self {
        Self {
            stream: self.stream.clone(),
            flush: Arc::clone(&self.flush),
        }
    }
}

impl<T> fmt::Debug for TriggeredPushStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggeredPushStream")
            .field("stream", &self.stream)
            .finish()
    }
}
