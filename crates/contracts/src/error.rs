//! Delivery failure definitions
//!
//! A single failure kind exists: a consume function rejected. The variants
//! only carry context for logs; callers treat every variant the same way.

use thiserror::Error;

/// Unified delivery failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Destination rejected the payload
    #[error("consumer '{consumer}' rejected delivery: {message}")]
    Rejected { consumer: String, message: String },

    /// Destination can no longer accept data
    #[error("consumer '{consumer}' is closed")]
    Closed { consumer: String },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl FeedError {
    /// Create a rejection error
    pub fn rejected(consumer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            consumer: consumer.into(),
            message: message.into(),
        }
    }

    /// Create a closed-destination error
    pub fn closed(consumer: impl Into<String>) -> Self {
        Self::Closed {
            consumer: consumer.into(),
        }
    }

    /// Create an untyped error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result of a single delivery
pub type FeedResult = Result<(), FeedError>;
