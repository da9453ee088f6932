//! Streaming summary statistics for per-job rate series.
//!
//! Uses Welford's online algorithm for numerically stable single-pass mean
//! and variance, plus running min/max. Reports use the population standard
//! deviation: a rate series is the complete set of jobs in a run, not a
//! sample from a larger one.

use serde::{Deserialize, Serialize};

/// Summary of a rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    /// Arithmetic mean of the series.
    pub mean: f64,
    /// Population standard deviation of the series.
    pub std_dev: f64,
    /// Smallest value in the series.
    pub min: f64,
    /// Largest value in the series.
    pub max: f64,
    /// Number of values summarized.
    pub count: usize,
}

/// Online accumulator for a rate series.
#[derive(Debug, Clone)]
pub struct RateAccumulator {
    count: usize,
    mean: f64,
    /// Welford's M2: sum of squared deviations from the running mean.
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for RateAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RateAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Fold one value into the running statistics.
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Number of values folded in so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Snapshot the accumulated statistics, or `None` if empty.
    pub fn finalize(&self) -> Option<RateSummary> {
        if self.count == 0 {
            return None;
        }
        let variance = self.m2 / self.count as f64;
        Some(RateSummary {
            mean: self.mean,
            std_dev: variance.max(0.0).sqrt(),
            min: self.min,
            max: self.max,
            count: self.count,
        })
    }
}

/// Summarize a complete series in one pass.
pub fn summarize(values: &[f64]) -> Option<RateSummary> {
    let mut acc = RateAccumulator::new();
    for &x in values {
        acc.update(x);
    }
    acc.finalize()
}
