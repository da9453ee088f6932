//! Pluggable analyzers over job histories.

mod success_rate;

pub use success_rate::{SuccessPredicate, SuccessRateAnalyzer};

use crate::error::Result;
use crate::result::AnalysisReport;
use crate::types::JobRecord;

/// A stateful aggregator of job records.
///
/// Analyzers hold their own independent history; the harness hands each
/// completed job to every registered analyzer exactly once and never mutates
/// a table after ingestion.
pub trait Analyzer {
    /// Append one job to the history.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed job (empty table or zero-sum counts).
    fn ingest(&mut self, job: &JobRecord) -> Result<()>;

    /// Recompute summary statistics over the full history.
    ///
    /// # Errors
    ///
    /// `EmptyHistory` if no jobs have been ingested.
    fn report(&self) -> Result<AnalysisReport>;

    /// Clear the history so the analyzer can be reused from a clean state.
    fn reset(&mut self);
}
