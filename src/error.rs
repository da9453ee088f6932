//! Error types for trial production and analysis.

use core::fmt;

use serde::Serialize;

/// Error returned by the harness, analyzers, and trial sources.
///
/// Parameter and input problems are detected eagerly at the call boundary
/// and never coerced (a zero shot count is an error, not an empty job).
/// Source failures are fatal to the current run but preserve any analyzer
/// state accumulated before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HarnessError {
    /// A structural parameter was out of range (e.g., zero parties, zero
    /// shots, more parties than the packed key representation supports).
    InvalidParameter(String),

    /// A malformed value was handed to an ingestion boundary, such as an
    /// empty frequency table or one whose counts sum to zero.
    InvalidInput(String),

    /// `report()` was called on an analyzer with no ingested jobs.
    EmptyHistory,

    /// A trial source failed to produce a job.
    ///
    /// The harness does not retry; retry policy, if any, belongs to the
    /// source implementation. `job` is the zero-based index of the job that
    /// failed.
    SourceFailure {
        /// Index of the job whose production failed.
        job: usize,
        /// Human-readable description from the source.
        message: String,
    },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::EmptyHistory => write!(f, "no jobs have been ingested"),
            Self::SourceFailure { job, message } => {
                write!(f, "trial source failed on job {job}: {message}")
            }
        }
    }
}

impl std::error::Error for HarnessError {}

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, HarnessError>;
