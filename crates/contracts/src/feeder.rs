//! Feeder trait - producer side of the connection protocol
//!
//! Defines the abstract interface for producers and the delivery primitive
//! every producer pushes through.

use tracing::{debug, trace, warn};

use crate::{ConsumeFn, ConsumeFuture, Feedable, Payload, PushStream};

/// Data producer
///
/// Implementations decide what is pushed, when, and through which stream in
/// `setup_feed`; callers only use `feeds`.
///
/// # Example
///
/// ```ignore
/// struct Once(u32);
///
/// impl Feeder<u32> for Once {
///     type Stream = PushStream<u32>;
///
///     fn setup_feed(&self, consume: ConsumeFn<u32>) -> PushStream<u32> {
///         let stream = PushStream::new();
///         tokio::spawn(self.next(Payload::One(self.0), &consume, &stream));
///         stream
///     }
/// }
/// ```
pub trait Feeder<T> {
    /// Connection handle handed back to the caller of `feeds`
    type Stream;

    /// Establish delivery to an already resolved consume function
    fn setup_feed(&self, consume: ConsumeFn<T>) -> Self::Stream;

    /// Wire this feeder to `target`
    fn feeds(&self, target: impl Into<Feedable<T>>) -> Self::Stream {
        self.setup_feed(target.into().into_consume_fn())
    }

    /// Push `data` through `stream` to `consume`
    ///
    /// See [`deliver`].
    fn next(
        &self,
        data: Payload<T>,
        consume: &ConsumeFn<T>,
        stream: &PushStream<T>,
    ) -> ConsumeFuture
    where
        T: Clone + Send + 'static,
    {
        deliver(data, consume, stream)
    }
}

/// Single delivery attempt with at most one redirect hop
///
/// - Disabled stream: resolves `Ok(())`, `consume` is never invoked.
/// - `consume` succeeds: resolves `Ok(())`.
/// - `consume` fails and the stream has an error handler: the handler gets the
///   original data and its outcome becomes the delivery outcome. A failing
///   handler is not redirected again.
/// - `consume` fails without handler: the original failure is returned.
///
/// The gate is read and `consume` is invoked when this function is called;
/// the returned future only awaits the outcome.
pub fn deliver<T>(
    data: Payload<T>,
    consume: &ConsumeFn<T>,
    stream: &PushStream<T>,
) -> ConsumeFuture
where
    T: Clone + Send + 'static,
{
    if !stream.enabled() {
        trace!(items = data.len(), outcome = "skipped", "stream disabled");
        return Box::pin(async { Ok(()) });
    }

    let attempt = consume.call(data.clone());
    let stream = stream.clone();

    Box::pin(async move {
        let err = match attempt.await {
            Ok(()) => {
                trace!(items = data.len(), outcome = "delivered", "delivery complete");
                return Ok(());
            }
            Err(err) => err,
        };

        let Some(handler) = stream.error_handler() else {
            warn!(items = data.len(), outcome = "failed", error = %err, "delivery failed");
            return Err(err);
        };

        debug!(items = data.len(), error = %err, "delivery failed, redirecting");
        match handler.call(data).await {
            Ok(()) => {
                debug!(outcome = "redirected", "redirect accepted");
                Ok(())
            }
            Err(redirect_err) => {
                warn!(
                    outcome = "failed",
                    error = %err,
                    redirect_error = %redirect_err,
                    "redirect failed"
                );
                Err(redirect_err)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedError;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<Payload<u32>>>>;

    fn recording(fail: bool) -> (ConsumeFn<u32>, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let consume = ConsumeFn::new(move |data: Payload<u32>| {
            sink.lock().unwrap().push(data.clone());
            async move {
                if fail {
                    Err(FeedError::rejected("recording", format!("{:?}", data)))
                } else {
                    Ok(())
                }
            }
        });
        (consume, calls)
    }

    #[tokio::test]
    async fn test_deliver_success() {
        let (consume, calls) = recording(false);
        let stream = PushStream::new();

        deliver(Payload::One(99), &consume, &stream).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![Payload::One(99)]);
    }

    #[tokio::test]
    async fn test_deliver_disabled_skips_consume() {
        let (consume, calls) = recording(true);
        let stream = PushStream::new();
        stream.disable();

        deliver(Payload::One(1), &consume, &stream).await.unwrap();

        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deliver_failure_without_handler() {
        let (consume, _) = recording(true);
        let stream = PushStream::new();

        let err = deliver(Payload::One(4), &consume, &stream).await.unwrap_err();

        assert_eq!(err, FeedError::rejected("recording", "One(4)"));
    }

    #[tokio::test]
    async fn test_deliver_redirects_once() {
        let (consume, _) = recording(true);
        let (handler, handled) = recording(false);
        let stream = PushStream::new();
        stream.throws_to(handler);

        deliver(Payload::One(2), &consume, &stream).await.unwrap();

        assert_eq!(*handled.lock().unwrap(), vec![Payload::One(2)]);
    }

    #[tokio::test]
    async fn test_deliver_failing_handler_surfaces_second_error() {
        let (consume, calls) = recording(true);
        let handler =
            ConsumeFn::new(|_: Payload<u32>| async { Err(FeedError::other("handler")) });
        let stream = PushStream::new();
        stream.throws_to(handler);

        let err = deliver(Payload::One(4), &consume, &stream).await.unwrap_err();

        assert_eq!(err, FeedError::other("handler"));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    struct Once(u32);

    impl Feeder<u32> for Once {
        type Stream = PushStream<u32>;

        fn setup_feed(&self, consume: ConsumeFn<u32>) -> PushStream<u32> {
            let stream = PushStream::new();
            tokio::spawn(self.next(Payload::One(self.0), &consume, &stream));
            stream
        }
    }

    #[tokio::test]
    async fn test_feeds_resolves_function_target() {
        let (consume, calls) = recording(false);

        let stream = Once(98).feeds(consume);

        assert!(stream.enabled());
        assert_eq!(*calls.lock().unwrap(), vec![Payload::One(98)]);
    }
}
