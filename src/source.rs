//! Trial sources: where batches of outcomes come from.
//!
//! A [`TrialSource`] produces one job's worth of independent trial outcomes
//! as a frequency table. The harness only ever sees this seam, so the same
//! run loop validates the in-process Monte-Carlo sampler and an external
//! execution backend alike.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{HarnessError, Result};
use crate::strategy::ParityStrategy;
use crate::types::{Configuration, FrequencyTable, OutcomeKey};

/// Produces one batch ("job") of independent trial outcomes.
///
/// Implementations must return a table whose counts sum to exactly the
/// requested shot count, and must not share mutable state between calls
/// beyond their own RNG stream.
pub trait TrialSource {
    /// Produce `shots` independent trials and return their outcome counts.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a zero shot count; `SourceFailure` when the
    /// underlying producer cannot complete the batch. Retry policy, if any,
    /// lives inside the implementation, never in the caller.
    fn produce_job(&mut self, shots: u64) -> Result<FrequencyTable>;
}

/// Monte-Carlo sampler over the parity strategy.
///
/// Each shot draws a fresh uniform configuration, plays one round, and
/// records the collapsed outcome key.
#[derive(Debug, Clone)]
pub struct ParityTrialSource {
    strategy: ParityStrategy,
    rng: Xoshiro256PlusPlus,
}

impl ParityTrialSource {
    /// Create a sampler seeded from OS entropy.
    pub fn new(parties: usize) -> Result<Self> {
        Ok(Self {
            strategy: ParityStrategy::new(parties)?,
            rng: Xoshiro256PlusPlus::from_entropy(),
        })
    }

    /// Create a reproducible sampler with an explicit seed.
    pub fn with_seed(parties: usize, seed: u64) -> Result<Self> {
        Ok(Self {
            strategy: ParityStrategy::new(parties)?,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    /// The strategy this source samples.
    pub fn strategy(&self) -> &ParityStrategy {
        &self.strategy
    }
}

impl TrialSource for ParityTrialSource {
    fn produce_job(&mut self, shots: u64) -> Result<FrequencyTable> {
        check_shots(shots)?;
        let mut table = FrequencyTable::new();
        for _ in 0..shots {
            let config = Configuration::random(self.strategy.parties(), &mut self.rng)?;
            let guesses = self.strategy.run_trial(&config, &mut self.rng)?;
            table.record(OutcomeKey::new(&config, &guesses)?);
        }
        Ok(table)
    }
}

/// Adapter wrapping a closure as a trial source.
///
/// This is the seam for external execution backends: the closure submits the
/// batch wherever it likes and returns the resulting counts. The adapter
/// enforces the one contract the harness relies on, that counts sum to the
/// requested shot count.
pub struct FnTrialSource<F> {
    produce: F,
}

impl<F> FnTrialSource<F>
where
    F: FnMut(u64) -> Result<FrequencyTable>,
{
    /// Wrap a batch-producing closure.
    pub fn new(produce: F) -> Self {
        Self { produce }
    }
}

impl<F> TrialSource for FnTrialSource<F>
where
    F: FnMut(u64) -> Result<FrequencyTable>,
{
    fn produce_job(&mut self, shots: u64) -> Result<FrequencyTable> {
        check_shots(shots)?;
        let table = (self.produce)(shots)?;
        let total = table.total_shots();
        if total != shots {
            return Err(HarnessError::SourceFailure {
                job: 0,
                message: format!("backend returned {total} counts for {shots} requested shots"),
            });
        }
        Ok(table)
    }
}

fn check_shots(shots: u64) -> Result<()> {
    if shots == 0 {
        return Err(HarnessError::InvalidParameter(
            "shot count must be at least 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SEED;

    #[test]
    fn job_counts_sum_to_shot_count() {
        let mut source = ParityTrialSource::with_seed(4, DEFAULT_SEED).unwrap();
        let table = source.produce_job(2048).unwrap();
        assert_eq!(table.total_shots(), 2048);
        assert_eq!(table.parties(), Some(4));
    }

    #[test]
    fn zero_shots_is_invalid() {
        let mut source = ParityTrialSource::with_seed(2, DEFAULT_SEED).unwrap();
        assert!(matches!(
            source.produce_job(0),
            Err(HarnessError::InvalidParameter(_))
        ));
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut a = ParityTrialSource::with_seed(3, 42).unwrap();
        let mut b = ParityTrialSource::with_seed(3, 42).unwrap();
        assert_eq!(a.produce_job(512).unwrap(), b.produce_job(512).unwrap());
    }

    #[test]
    fn fn_source_rejects_short_batches() {
        let mut source = FnTrialSource::new(|shots| {
            let mut inner = ParityTrialSource::with_seed(2, DEFAULT_SEED)?;
            inner.produce_job(shots / 2)
        });
        assert!(matches!(
            source.produce_job(100),
            Err(HarnessError::SourceFailure { .. })
        ));
    }

    #[test]
    fn fn_source_passes_valid_batches_through() {
        let mut source = FnTrialSource::new(|shots| {
            ParityTrialSource::with_seed(2, DEFAULT_SEED)?.produce_job(shots)
        });
        assert_eq!(source.produce_job(100).unwrap().total_shots(), 100);
    }
}
