//! # Consumers
//!
//! Ready-made named consumers.
//!
//! - `LogConsumer`: logs every payload through tracing
//! - `CollectConsumer`: keeps every payload, optionally refusing some

mod collect;
mod log;

pub use contracts::{Consumer, Feedable, Payload};

pub use self::collect::CollectConsumer;
pub use self::log::LogConsumer;
