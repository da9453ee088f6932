//! Closed-form expectations for the parity game and the observed-vs-theory
//! comparator.
//!
//! Under the parity strategy with a coin-flip leader the distribution over
//! "number of parties correct" is trimodal for `N >= 2`. The leader is
//! correct exactly when its coin matches its own color; the first follower
//! is correct exactly when that same coin matches the parity of the colors
//! the leader sees. Those are two independent fair-coin events over
//! independent colors, and every announcement from party 1 onward carries
//! enough parity information for the leader's error to cancel, so parties
//! `2..N-1` are always correct. Hence:
//!
//! - all `N` correct with probability 1/4,
//! - exactly `N-1` correct with probability 1/2,
//! - exactly `N-2` correct with probability 1/4,
//!
//! and every other bucket exactly zero. A single party degenerates to a lone
//! coin flip. Observed mass outside the reachable buckets signals an
//! inference bug in the strategy or the trial source, which is how the test
//! suite detects regressions.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOLERANCE, DEFAULT_ZERO_MASS_EPSILON, MAX_PARTIES};
use crate::error::{HarnessError, Result};

/// Closed-form distribution over "number of parties correct",
/// parameterized only by the party count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheoreticalProfile {
    parties: usize,
    /// Bucket `c` holds the probability of exactly `c` correct parties.
    probabilities: Vec<f64>,
}

impl TheoreticalProfile {
    /// Derive the profile for `parties` parties.
    ///
    /// For a single party the strategy degenerates to a lone coin flip:
    /// buckets 0 and 1 each get probability 1/2. For two or more parties
    /// the leader and first follower are independent coins and everyone
    /// else is guaranteed correct, giving the trimodal 1/4, 1/2, 1/4 shape
    /// over the top three buckets.
    pub fn new(parties: usize) -> Result<Self> {
        if parties == 0 || parties > MAX_PARTIES {
            return Err(HarnessError::InvalidParameter(format!(
                "party count must be between 1 and {MAX_PARTIES}, got {parties}"
            )));
        }
        let mut probabilities = vec![0.0; parties + 1];
        if parties == 1 {
            probabilities[0] = 0.5;
            probabilities[1] = 0.5;
        } else {
            probabilities[parties] = 0.25;
            probabilities[parties - 1] = 0.5;
            probabilities[parties - 2] = 0.25;
        }
        Ok(Self {
            parties,
            probabilities,
        })
    }

    /// Party count the profile was derived for.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Probability of exactly `correct` parties being right.
    pub fn probability(&self, correct: usize) -> f64 {
        self.probabilities.get(correct).copied().unwrap_or(0.0)
    }

    /// Full bucket vector, index = number correct.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability that every party is simultaneously correct.
    pub fn all_correct_probability(&self) -> f64 {
        self.probabilities[self.parties]
    }
}

/// Deviation report from comparing an observed distribution to the theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Absolute deviation per bucket, index = number correct.
    pub deviations: Vec<f64>,
    /// Largest per-bucket deviation.
    pub max_deviation: f64,
    /// True when any bucket deviates beyond the configured tolerance.
    pub exceeds_tolerance: bool,
    /// True when a theoretically-zero bucket carries observed mass beyond
    /// the noise epsilon.
    pub impossible_mass: bool,
    /// The tolerance the deviations were checked against.
    pub tolerance: f64,
}

/// Compares observed correct-count distributions against the closed form.
///
/// Stateless: every comparison is a pure function of the inputs and the two
/// configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheoryComparator {
    tolerance: f64,
    zero_mass_epsilon: f64,
}

impl Default for TheoryComparator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            zero_mass_epsilon: DEFAULT_ZERO_MASS_EPSILON,
        }
    }
}

impl TheoryComparator {
    /// Create a comparator with the default thresholds (2pp deviation
    /// tolerance, 0.5% impossible-mass epsilon).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-bucket deviation tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the mass threshold for theoretically-zero buckets.
    pub fn zero_mass_epsilon(mut self, epsilon: f64) -> Self {
        self.zero_mass_epsilon = epsilon;
        self
    }

    /// Compare an observed distribution (index = number correct, one bucket
    /// per count from 0 to `parties`) against the theory for `parties`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an unsupported party count; `InvalidInput`
    /// when the observed vector has the wrong number of buckets.
    pub fn compare(&self, observed: &[f64], parties: usize) -> Result<ComparisonReport> {
        let profile = TheoreticalProfile::new(parties)?;
        if observed.len() != profile.probabilities().len() {
            return Err(HarnessError::InvalidInput(format!(
                "observed distribution has {} buckets, expected {}",
                observed.len(),
                profile.probabilities().len()
            )));
        }

        let deviations: Vec<f64> = observed
            .iter()
            .zip(profile.probabilities())
            .map(|(obs, exp)| (obs - exp).abs())
            .collect();
        let max_deviation = deviations.iter().copied().fold(0.0, f64::max);

        let impossible_mass = observed
            .iter()
            .zip(profile.probabilities())
            .any(|(obs, exp)| *exp == 0.0 && *obs > self.zero_mass_epsilon);

        Ok(ComparisonReport {
            exceeds_tolerance: max_deviation > self.tolerance,
            impossible_mass,
            max_deviation,
            deviations,
            tolerance: self.tolerance,
        })
    }
}
