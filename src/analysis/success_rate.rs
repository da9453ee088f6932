//! Success-rate analysis with a late-bound success predicate.

use crate::analysis::Analyzer;
use crate::error::{HarnessError, Result};
use crate::result::AnalysisReport;
use crate::statistics::summarize;
use crate::types::{JobRecord, OutcomeKey};

/// Boolean classification of an outcome key, defining "success".
pub type SuccessPredicate = Box<dyn Fn(&OutcomeKey) -> bool + Send + Sync>;

/// Accumulates job histories and scores them against a swappable predicate.
///
/// The predicate is consulted only at [`report`](Analyzer::report) time, so
/// the same accumulated history can be re-scored under different success
/// definitions without re-ingesting anything. The default predicate counts a
/// shot as successful when every party guessed correctly.
pub struct SuccessRateAnalyzer {
    predicate: SuccessPredicate,
    history: Vec<JobRecord>,
}

impl Default for SuccessRateAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SuccessRateAnalyzer {
    /// Create an analyzer with the all-parties-correct predicate.
    pub fn new() -> Self {
        Self::with_predicate(|key: &OutcomeKey| key.correct_count() == key.parties())
    }

    /// Create an analyzer with a custom predicate.
    pub fn with_predicate<P>(predicate: P) -> Self
    where
        P: Fn(&OutcomeKey) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            history: Vec::new(),
        }
    }

    /// Replace the success predicate.
    ///
    /// Takes effect for the very next report, including over jobs ingested
    /// before the swap.
    pub fn set_success_predicate<P>(&mut self, predicate: P)
    where
        P: Fn(&OutcomeKey) -> bool + Send + Sync + 'static,
    {
        self.predicate = Box::new(predicate);
    }

    /// Number of jobs in the history.
    pub fn jobs_ingested(&self) -> usize {
        self.history.len()
    }

    fn job_rate(&self, job: &JobRecord) -> f64 {
        let total = job.table.total_shots();
        let successful: u64 = job
            .table
            .iter()
            .filter(|(key, _)| (self.predicate)(key))
            .map(|(_, count)| *count)
            .sum();
        successful as f64 / total as f64
    }
}

impl Analyzer for SuccessRateAnalyzer {
    fn ingest(&mut self, job: &JobRecord) -> Result<()> {
        if job.table.is_empty() {
            return Err(HarnessError::InvalidInput(format!(
                "job {} has an empty frequency table",
                job.index
            )));
        }
        if job.table.total_shots() == 0 {
            return Err(HarnessError::InvalidInput(format!(
                "job {} counts sum to zero",
                job.index
            )));
        }
        self.history.push(job.clone());
        Ok(())
    }

    fn report(&self) -> Result<AnalysisReport> {
        if self.history.is_empty() {
            return Err(HarnessError::EmptyHistory);
        }
        let job_rates: Vec<f64> = self.history.iter().map(|job| self.job_rate(job)).collect();
        // summarize() is only None for an empty series, excluded above.
        let summary = summarize(&job_rates).ok_or(HarnessError::EmptyHistory)?;
        Ok(AnalysisReport {
            total_jobs: job_rates.len(),
            job_rates,
            summary,
        })
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}
