//! Run configuration.

use crate::constants::{DEFAULT_JOBS, DEFAULT_PARTIES, DEFAULT_SHOTS_PER_JOB, MAX_PARTIES};
use crate::error::{HarnessError, Result};

/// Configuration for a validation run.
///
/// Defaults mirror the workloads the framework was built around: 1000 jobs
/// of 1024 shots over the four-party game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of jobs (independent batches) to run.
    pub jobs: usize,

    /// Number of shots (independent trials) per job.
    pub shots_per_job: u64,

    /// Number of parties in the parity game.
    pub parties: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            shots_per_job: DEFAULT_SHOTS_PER_JOB,
            parties: DEFAULT_PARTIES,
        }
    }
}

impl Config {
    /// Check every parameter eagerly, before any work starts.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` naming the offending field. Out-of-range values
    /// are never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(HarnessError::InvalidParameter(
                "job count must be at least 1".into(),
            ));
        }
        if self.shots_per_job == 0 {
            return Err(HarnessError::InvalidParameter(
                "shots per job must be at least 1".into(),
            ));
        }
        if self.parties == 0 || self.parties > MAX_PARTIES {
            return Err(HarnessError::InvalidParameter(format!(
                "party count must be between 1 and {MAX_PARTIES}, got {}",
                self.parties
            )));
        }
        Ok(())
    }
}
