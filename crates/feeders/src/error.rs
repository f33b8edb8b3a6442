//! Feeder error types

use thiserror::Error;

/// Feeder configuration errors
#[derive(Debug, Error)]
pub enum FeederError {
    /// Interval period must be non-zero
    #[error("feeder '{feeder}' has a zero period")]
    ZeroPeriod {
        /// Feeder name
        feeder: String,
    },

    /// Pulse limit must be non-zero when set
    #[error("feeder '{feeder}' has max_pulses set to 0")]
    ZeroPulseLimit {
        /// Feeder name
        feeder: String,
    },
}

/// Feeder Result type alias
pub type Result<T> = std::result::Result<T, FeederError>;
