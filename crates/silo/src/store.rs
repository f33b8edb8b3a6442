//! Append-only value store drained as a whole.

use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::Payload;

/// Ordered buffer shared by a silo and the triggers it hands out
///
/// The lock is only held for a synchronous append or swap, never across an
/// await point.
pub(crate) struct Store<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Store<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Append a payload in arrival order, returning the new depth
    pub(crate) fn append(&self, data: Payload<T>) -> usize {
        let mut items = self.lock();
        match data {
            Payload::One(item) => items.push(item),
            Payload::Batch(batch) => items.extend(batch),
        }
        items.len()
    }

    /// Swap the buffer for an empty one and return the former contents
    pub(crate) fn drain(&self) -> Vec<T> {
        mem::take(&mut *self.lock())
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
