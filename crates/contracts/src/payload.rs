//! Payload - one value or a batch of values

/// Data carried by a single delivery
///
/// Feeders may push individual values or whole batches through the same
/// consume function; a `Silo` flush always delivers a `Batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<T> {
    /// A single value
    One(T),
    /// An ordered batch of values (possibly empty)
    Batch(Vec<T>),
}

impl<T> Payload<T> {
    /// Number of values carried
    pub fn len(&self) -> usize {
        match self {
            Payload::One(_) => 1,
            Payload::Batch(items) => items.len(),
        }
    }

    /// True for an empty batch
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this payload is a batch
    pub fn is_batch(&self) -> bool {
        matches!(self, Payload::Batch(_))
    }

    /// Flatten into a vector, preserving order
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Payload::One(item) => vec![item],
            Payload::Batch(items) => items,
        }
    }

    /// Iterate over the carried values
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Payload::One(item) => std::slice::from_ref(item).iter(),
            Payload::Batch(items) => items.iter(),
        }
    }
}

impl<T> From<Vec<T>> for Payload<T> {
    fn from(items: Vec<T>) -> Self {
        Payload::Batch(items)
    }
}
