//! # Silo
//!
//! Buffering stage between producers and a downstream consumer.
//!
//! Responsibilities:
//! - Accept pushes from any number of feeders, in arrival order
//! - Hold them until a trigger fires
//! - Release everything held as a single batch
//!
//! ## Concurrent Triggers
//!
//! Triggers are not queued. Each swap of the buffer is atomic, so every value
//! is released by exactly one flush, but overlapping flushes may reach the
//! downstream consumer in any order.

mod silo;
mod store;
mod stream;

pub use contracts::{ConsumeFn, Feeder, Payload};
pub use silo::Silo;
pub use stream::TriggeredPushStream;
