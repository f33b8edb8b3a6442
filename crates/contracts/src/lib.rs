//! # Contracts
//!
//! Connection protocol between producers and consumers.
//! All other crates build on this one; it depends on none of them.
//!
//! ## Delivery Model
//! - A `Feeder` is wired to a destination with `feeds`, which hands back a
//!   `PushStream`
//! - Every push goes through `deliver`: gated by `enabled`, redirected once to
//!   the `throws_to` handler on failure
//! - Failures are plain `Err(FeedError)` values returned to the pushing code

mod consume;
mod consumer;
mod error;
mod feeder;
mod payload;
mod stream;

pub use consume::{ConsumeFn, ConsumeFuture};
pub use consumer::{Consumer, Feedable, LocalConsumer};
pub use error::{FeedError, FeedResult};
pub use feeder::{deliver, Feeder};
pub use payload::Payload;
pub use stream::PushStream;
