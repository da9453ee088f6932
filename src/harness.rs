//! The validation harness: runs jobs, feeds analyzers, aggregates results.
//!
//! The job loop is sequential by contract. Jobs are independent samples, so
//! the aggregate table is merge-order independent; only the first-job
//! preview is order-sensitive, and it is pinned to job 0 by construction.
//! The harness holds no lock across `produce_job`, tolerates arbitrary
//! per-job latency from external sources, and applies no retry or timeout of
//! its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::error::{HarnessError, Result};
use crate::result::{AnalysisReport, RunOutcome, RunReport, RunSummary};
use crate::source::TrialSource;
use crate::types::{FrequencyTable, JobRecord};

/// Orchestrates a validation run.
///
/// # Example
///
/// ```
/// use trial_oracle::{ParityTrialSource, SuccessRateAnalyzer, ValidationHarness};
///
/// let mut source = ParityTrialSource::with_seed(4, 7).unwrap();
/// let mut analyzers: Vec<Box<dyn trial_oracle::Analyzer>> =
///     vec![Box::new(SuccessRateAnalyzer::new())];
///
/// let outcome = ValidationHarness::new()
///     .jobs(20)
///     .shots_per_job(256)
///     .run(&mut source, &mut analyzers);
/// assert!(outcome.is_completed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationHarness {
    config: Config,
    cancel: Option<Arc<AtomicBool>>,
}

impl ValidationHarness {
    /// Create a harness with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a harness from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Set the number of jobs to run.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    /// Set the number of shots per job.
    pub fn shots_per_job(mut self, shots: u64) -> Self {
        self.config.shots_per_job = shots;
        self
    }

    /// Install an external cancellation flag.
    ///
    /// The flag is checked between jobs, never mid-job. A cancelled run
    /// returns its partial results exactly like the failure path.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the configured number of jobs against `source`, feeding every
    /// completed job to every analyzer.
    ///
    /// All jobs, the first included, are ingested identically; the first
    /// job's table is additionally kept un-aggregated for previews. A source
    /// failure aborts the remaining jobs but preserves analyzer state from
    /// the jobs already ingested.
    pub fn run(
        &self,
        source: &mut dyn TrialSource,
        analyzers: &mut [Box<dyn Analyzer>],
    ) -> RunOutcome {
        if let Err(error) = self.validate_run() {
            return RunOutcome::Aborted {
                error,
                report: empty_report(analyzers, self.config.shots_per_job),
            };
        }

        let shots = self.config.shots_per_job;
        let started = Instant::now();

        let mut first_job: Option<FrequencyTable> = None;
        let mut aggregate = FrequencyTable::new();
        let mut jobs_completed = 0;

        let mut failure: Option<HarnessError> = None;
        let mut cancelled = false;

        for index in 0..self.config.jobs {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            let table = match source.produce_job(shots) {
                Ok(table) => table,
                Err(HarnessError::SourceFailure { message, .. }) => {
                    failure = Some(HarnessError::SourceFailure {
                        job: index,
                        message,
                    });
                    break;
                }
                Err(other) => {
                    failure = Some(other);
                    break;
                }
            };

            let job = JobRecord {
                index,
                shots,
                table,
            };

            if let Err(error) = ingest_all(analyzers, &job) {
                failure = Some(error);
                break;
            }

            aggregate.merge(&job.table);
            if index == 0 {
                first_job = Some(job.table);
            }
            jobs_completed += 1;
        }

        let report = RunReport {
            first_job,
            aggregate,
            analyzer_reports: collect_reports(analyzers),
            summary: summarize_run(jobs_completed, shots, started.elapsed().as_secs_f64()),
        };

        if let Some(error) = failure {
            RunOutcome::Aborted { error, report }
        } else if cancelled {
            RunOutcome::Cancelled(report)
        } else {
            RunOutcome::Completed(report)
        }
    }

    fn validate_run(&self) -> Result<()> {
        if self.config.jobs == 0 {
            return Err(HarnessError::InvalidParameter(
                "job count must be at least 1".into(),
            ));
        }
        if self.config.shots_per_job == 0 {
            return Err(HarnessError::InvalidParameter(
                "shots per job must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Feed one job to every analyzer, atomically per job from each analyzer's
/// point of view.
fn ingest_all(analyzers: &mut [Box<dyn Analyzer>], job: &JobRecord) -> Result<()> {
    for analyzer in analyzers.iter_mut() {
        analyzer.ingest(job)?;
    }
    Ok(())
}

fn collect_reports(analyzers: &[Box<dyn Analyzer>]) -> Vec<Option<AnalysisReport>> {
    analyzers
        .iter()
        .map(|analyzer| analyzer.report().ok())
        .collect()
}

fn summarize_run(jobs_completed: usize, shots_per_job: u64, elapsed_secs: f64) -> RunSummary {
    let total_shots = jobs_completed as u64 * shots_per_job;
    let shots_per_second = if elapsed_secs > 0.0 {
        total_shots as f64 / elapsed_secs
    } else {
        0.0
    };
    RunSummary {
        jobs_completed,
        shots_per_job,
        total_shots,
        elapsed_secs,
        shots_per_second,
    }
}

/// Report for a run that aborted before producing anything. Analyzers still
/// get a slot each so callers can see state they ingested out of band.
fn empty_report(analyzers: &[Box<dyn Analyzer>], shots_per_job: u64) -> RunReport {
    RunReport {
        first_job: None,
        aggregate: FrequencyTable::new(),
        analyzer_reports: collect_reports(analyzers),
        summary: summarize_run(0, shots_per_job, 0.0),
    }
}
