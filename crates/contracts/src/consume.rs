//! ConsumeFn - the asynchronous consume function contract

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{FeedResult, Payload};

/// Boxed future returned by every consume function
pub type ConsumeFuture = Pin<Box<dyn Future<Output = FeedResult> + Send + 'static>>;

type ConsumeHandler<T> = dyn Fn(Payload<T>) -> ConsumeFuture + Send + Sync;

/// Asynchronous function accepting one value or a batch of values
///
/// Cloning is cheap and keeps the binding identity, see [`ConsumeFn::ptr_eq`].
pub struct ConsumeFn<T> {
    handler: Arc<ConsumeHandler<T>>,
}

impl<T> ConsumeFn<T> {
    /// Wrap an async closure
    ///
    /// # Example
    ///
    /// ```ignore
    /// let print = ConsumeFn::new(|data: Payload<u32>| async move {
    ///     println!("{:?}", data);
    ///     Ok(())
    /// });
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        T: 'static,
        F: Fn(Payload<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FeedResult> + Send + 'static,
    {
        let handler: Arc<ConsumeHandler<T>> =
            Arc::new(move |data: Payload<T>| -> ConsumeFuture { Box::pin(f(data)) });
        Self { handler }
    }

    /// Consume function accepting everything
    pub fn ok() -> Self
    where
        T: 'static,
    {
        Self::new(|_| async { Ok(()) })
    }

    /// Invoke the function
    pub fn call(&self, data: Payload<T>) -> ConsumeFuture {
        (self.handler)(data)
    }

    /// Check if both handles are bound to the same function
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<T> Clone for ConsumeFn<T> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for ConsumeFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumeFn")
            .field("handler", &Arc::as_ptr(&self.handler))
            .finish()
    }
}
