//! PushStream - live connection handle between a feeder and its destination
//!
//! Owns the enabled gate and the redirect-on-failure hook. Clones share the
//! same state, so a feeder's in-flight deliveries observe every change made
//! through the handle returned by `feeds`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::{ConsumeFn, Feedable};

type ResumeFn = Arc<dyn Fn() + Send + Sync>;

struct StreamState<T> {
    enabled: AtomicBool,
    resume: Mutex<Option<ResumeFn>>,
    error_handler: Mutex<Option<ConsumeFn<T>>>,
}

/// Connection handle returned by `Feeder::feeds`
pub struct PushStream<T> {
    state: Arc<StreamState<T>>,
}

impl<T> PushStream<T> {
    /// Create an enabled stream with no resume callback and no error handler
    pub fn new() -> Self {
        Self {
            state: Arc::new(StreamState {
                enabled: AtomicBool::new(true),
                resume: Mutex::new(None),
                error_handler: Mutex::new(None),
            }),
        }
    }

    /// Check if deliveries currently go through
    pub fn enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    /// Update the enabled gate
    ///
    /// The resume callback runs synchronously after the flag is stored, and
    /// only on a `false -> true` transition.
    pub fn set_enabled(&self, enabled: bool) {
        let was_enabled = self.state.enabled.swap(enabled, Ordering::SeqCst);
        if !was_enabled && enabled {
            trace!("push stream resumed");
            self.fire_resume();
        }
    }

    /// Shorthand for `set_enabled(true)`
    pub fn enable(&self) {
        self.set_enabled(true);
    }

    /// Shorthand for `set_enabled(false)`
    pub fn disable(&self) {
        self.set_enabled(false);
    }

    /// Install the callback fired when the stream is re-enabled
    pub fn set_resume<F>(&self, resume: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *lock(&self.state.resume) = Some(Arc::new(resume));
    }

    /// Remove the resume callback
    pub fn clear_resume(&self) {
        *lock(&self.state.resume) = None;
    }

    /// Redirect failed deliveries to `handler`
    ///
    /// Replaces any previously registered handler.
    pub fn throws_to(&self, handler: impl Into<Feedable<T>>) -> &Self {
        *lock(&self.state.error_handler) = Some(handler.into().into_consume_fn());
        self
    }

    /// Currently registered error handler
    pub fn error_handler(&self) -> Option<ConsumeFn<T>> {
        lock(&self.state.error_handler).clone()
    }

    /// Check if failures are redirected
    pub fn has_error_handler(&self) -> bool {
        lock(&self.state.error_handler).is_some()
    }

    fn fire_resume(&self) {
        // Released before the call so the callback may use the stream.
        let resume = lock(&self.state.resume).clone();
        if let Some(resume) = resume {
            resume();
        }
    }
}

impl<T> Default for PushStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PushStream<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for PushStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushStream")
            .field("enabled", &self.enabled())
            .field("has_error_handler", &self.has_error_handler())
            .finish()
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_resume(stream: &PushStream<u32>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        stream.set_resume(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_stream_enabled_by_default() {
        let stream = PushStream::<u32>::new();
        assert!(stream.enabled());
        assert!(!stream.has_error_handler());
    }

    #[test]
    fn test_resume_fires_on_rising_edge_only() {
        let stream = PushStream::<u32>::new();
        let resumed = counting_resume(&stream);

        stream.set_enabled(true);
        stream.set_enabled(false);
        stream.set_enabled(false);
        assert_eq!(resumed.load(Ordering::SeqCst), 0);

        stream.set_enabled(true);
        assert_eq!(resumed.load(Ordering::SeqCst), 1);

        stream.set_enabled(true);
        assert_eq!(resumed.load(Ordering::SeqCst), 1);

        stream.disable();
        stream.enable();
        assert_eq!(resumed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resume_sees_updated_flag() {
        let stream = PushStream::<u32>::new();
        let observed = Arc::new(AtomicBool::new(false));
        let handle = stream.clone();
        let seen = Arc::clone(&observed);
        stream.set_resume(move || seen.store(handle.enabled(), Ordering::SeqCst));

        stream.disable();
        stream.enable();
        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_clones_share_state() {
        let stream = PushStream::<u32>::new();
        let other = stream.clone();
        other.disable();
        assert!(!stream.enabled());
    }

    #[test]
    fn test_throws_to_replaces_handler() {
        let stream = PushStream::<u32>::new();
        let first = ConsumeFn::ok();
        let second = ConsumeFn::ok();

        stream.throws_to(&first).throws_to(&second);

        let handler = stream.error_handler().unwrap();
        assert!(handler.ptr_eq(&second));
        assert!(!handler.ptr_eq(&first));
    }
}
