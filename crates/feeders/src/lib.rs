//! # Feeders
//!
//! Ready-made producers.
//!
//! - `IterFeeder`: replays a fixed sequence, value by value or as one batch
//! - `IntervalFeeder`: emits a pulse counter on a timer, the usual release
//!   signal for a silo trigger
//!
//! ## Usage Example
//!
//! ```ignore
//! use feeders::{IntervalFeeder, IterFeeder};
//! use contracts::Feeder;
//!
//! IterFeeder::new("readings", vec![1, 2, 3]).feeds(&silo);
//!
//! let clock = IntervalFeeder::every("clock", Duration::from_secs(1))?;
//! clock.feeds(silo.feeds(&archive).trigger::<u64>());
//! ```

mod config;
mod error;
mod interval;
mod iter;

pub use config::{FeederStats, IntervalFeederConfig};
pub use error::{FeederError, Result};
pub use interval::IntervalFeeder;
pub use iter::{IterFeeder, IterMode};
