//! Result types: analyzer reports and run-level outcome payloads.

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::statistics::RateSummary;
use crate::types::FrequencyTable;

/// Read-only snapshot of an analyzer's accumulated state.
///
/// Recomputed on demand from the analyzer's full job history with the
/// currently installed predicate; never cached across ingestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Per-job success rates, in ingestion order.
    pub job_rates: Vec<f64>,
    /// Mean, population standard deviation, min, and max of `job_rates`.
    pub summary: RateSummary,
    /// Number of jobs ingested.
    pub total_jobs: usize,
}

/// Timing and throughput figures for one harness run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Jobs that completed and were ingested.
    pub jobs_completed: usize,
    /// Shots requested per job.
    pub shots_per_job: u64,
    /// Total shots across completed jobs.
    pub total_shots: u64,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
    /// Completed shots per second; 0 when the elapsed time rounds to zero.
    pub shots_per_second: f64,
}

/// Everything a harness run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The first job's table, un-aggregated, for single-job previews.
    /// `None` only when the run failed or was cancelled before job 0.
    pub first_job: Option<FrequencyTable>,
    /// Union of every completed job's table, counts summed.
    pub aggregate: FrequencyTable,
    /// One entry per registered analyzer, in registration order. `None`
    /// means that analyzer had no ingested history to report on.
    pub analyzer_reports: Vec<Option<AnalysisReport>>,
    /// Timing and throughput.
    pub summary: RunSummary,
}

/// Outcome of a harness run.
///
/// Failure and cancellation still carry the partial report, so a caller can
/// distinguish "no data" from "some data before the interruption".
#[derive(Debug, Clone, Serialize)]
pub enum RunOutcome {
    /// Every requested job completed.
    Completed(RunReport),
    /// The trial source failed mid-run; remaining jobs were abandoned.
    Aborted {
        /// The failure surfaced by the source.
        error: HarnessError,
        /// State accumulated before the failure.
        report: RunReport,
    },
    /// The cancellation flag was observed between jobs.
    Cancelled(RunReport),
}

impl RunOutcome {
    /// The report, whether the run finished or not.
    pub fn report(&self) -> &RunReport {
        match self {
            Self::Completed(report) | Self::Cancelled(report) => report,
            Self::Aborted { report, .. } => report,
        }
    }

    /// The source failure, if the run aborted.
    pub fn error(&self) -> Option<&HarnessError> {
        match self {
            Self::Aborted { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Whether every requested job completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
