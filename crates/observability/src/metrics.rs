//! Delivery metrics
//!
//! Recorders for the `metrics` facade plus an in-memory aggregator for
//! end-of-run summaries.

use contracts::FeedResult;
use metrics::{counter, gauge, histogram};

/// Record one delivery issued by a feeder
pub fn record_delivery(feeder: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "feedline_deliveries_total",
        "feeder" => feeder.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a silo flush and the size of the released batch
pub fn record_silo_flush(silo: &str, batch_len: usize, success: bool) {
    counter!("feedline_silo_flushes_total", "silo" => silo.to_string()).increment(1);
    histogram!("feedline_silo_batch_size", "silo" => silo.to_string()).record(batch_len as f64);

    if !success {
        counter!("feedline_silo_flush_failures_total", "silo" => silo.to_string()).increment(1);
        // Drained values are not restored after a failed flush.
        counter!("feedline_silo_values_lost_total", "silo" => silo.to_string())
            .increment(batch_len as u64);
    }
}

/// Record the number of values currently held by a silo
pub fn record_silo_depth(silo: &str, depth: usize) {
    gauge!("feedline_silo_depth", "silo" => silo.to_string()).set(depth as f64);
}

/// Record a pulse emitted by a timer feeder
pub fn record_pulse(feeder: &str) {
    counter!("feedline_pulses_total", "feeder" => feeder.to_string()).increment(1);
}

/// In-memory delivery statistics
#[derive(Debug, Clone, Default)]
pub struct FeedMetricsAggregator {
    /// Successful deliveries (including redirected ones)
    pub delivered: u64,

    /// Failed deliveries
    pub failed: u64,

    /// Silo flushes
    pub flushes: u64,

    /// Failed silo flushes
    pub flush_failures: u64,

    /// Released batch sizes
    pub batch_stats: RunningStats,
}

impl FeedMetricsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a delivery outcome
    pub fn update_delivery(&mut self, outcome: &FeedResult) {
        match outcome {
            Ok(()) => self.delivered += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// Account for a flush outcome
    pub fn update_flush(&mut self, batch_len: usize, outcome: &FeedResult) {
        self.flushes += 1;
        self.batch_stats.push(batch_len as f64);
        if outcome.is_err() {
            self.flush_failures += 1;
        }
    }

    /// Build a summary report
    pub fn summary(&self) -> FeedMetricsSummary {
        let total = self.delivered + self.failed;
        FeedMetricsSummary {
            delivered: self.delivered,
            failed: self.failed,
            failure_rate: if total > 0 {
                self.failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            flushes: self.flushes,
            flush_failures: self.flush_failures,
            batch_size: StatsSummary::from(&self.batch_stats),
        }
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Delivery summary
#[derive(Debug, Clone, Default)]
pub struct FeedMetricsSummary {
    pub delivered: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub flushes: u64,
    pub flush_failures: u64,
    pub batch_size: StatsSummary,
}

impl std::fmt::Display for FeedMetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Feed Metrics Summary ===")?;
        writeln!(f, "Delivered: {}", self.delivered)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(
            f,
            "Silo flushes: {} ({} failed)",
            self.flushes, self.flush_failures
        )?;
        writeln!(f, "Batch size: {}", self.batch_size)
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
