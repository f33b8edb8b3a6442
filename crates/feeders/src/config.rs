//! Feeder configuration and statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use contracts::FeedResult;

use crate::error::{FeederError, Result};

/// Interval feeder configuration
#[derive(Debug, Clone)]
pub struct IntervalFeederConfig {
    /// Feeder name (used for logging/metrics)
    pub name: String,

    /// Time between two pulses
    pub period: Duration,

    /// Stop after this many delivered pulses (None = run until stopped)
    pub max_pulses: Option<u64>,
}

impl Default for IntervalFeederConfig {
    fn default() -> Self {
        Self {
            name: "interval".to_string(),
            period: Duration::from_secs(1),
            max_pulses: None,
        }
    }
}

impl IntervalFeederConfig {
    /// Check the configuration can drive a timer
    pub fn validate(&self) -> Result<()> {
        if self.period.is_zero() {
            return Err(FeederError::ZeroPeriod {
                feeder: self.name.clone(),
            });
        }
        if self.max_pulses == Some(0) {
            return Err(FeederError::ZeroPulseLimit {
                feeder: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Per-feeder delivery counters
#[derive(Debug, Default)]
pub struct FeederStats {
    /// Deliveries that resolved successfully (including redirected and skipped)
    delivered: AtomicU64,

    /// Deliveries that failed after the redirect attempt
    failed: AtomicU64,
}

impl FeederStats {
    /// Create new counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a delivery outcome
    pub fn record(&self, outcome: &FeedResult) {
        match outcome {
            Ok(()) => self.delivered.fetch_add(1, Ordering::Relaxed),
            Err(_) => self.failed.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get successful delivery count
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Get failed delivery count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
