//! # trial-oracle
//!
//! Trial-based statistical validation for probabilistic guessing games.
//!
//! The worked example is the N-party parity-inference game: each party must
//! guess a hidden binary attribute (its own "hair color") while seeing only
//! the attributes of the parties after it and hearing only the guesses
//! announced before it. Under the parity strategy the opening announcement
//! is an unconstrained coin flip, the first follower inherits that coin,
//! and every later party corrects for it. For `N >= 2` the group lands on
//! `N` correct with probability 1/4, `N - 1` with probability 1/2, and
//! `N - 2` with probability 1/4.
//!
//! The crate runs repeated batches ("jobs") of independent trials from a
//! [`TrialSource`], feeds each job's outcome-frequency table to pluggable
//! [`Analyzer`]s, aggregates a cumulative table with timing and throughput
//! figures, and checks the observed distribution against the closed-form
//! expectation with [`TheoryComparator`].
//!
//! ## Quick Start
//!
//! ```
//! use trial_oracle::{
//!     Analyzer, ParityTrialSource, SuccessRateAnalyzer, TheoryComparator, ValidationHarness,
//! };
//!
//! let mut source = ParityTrialSource::with_seed(4, 1234).unwrap();
//! let mut analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(SuccessRateAnalyzer::new())];
//!
//! let outcome = ValidationHarness::new()
//!     .jobs(50)
//!     .shots_per_job(1024)
//!     .run(&mut source, &mut analyzers);
//!
//! let observed = outcome.report().aggregate.correct_count_distribution().unwrap();
//! let comparison = TheoryComparator::new().compare(&observed, 4).unwrap();
//! assert!(!comparison.impossible_mass);
//! ```
//!
//! External execution backends plug in through the same seam: wrap the
//! backend call in a [`FnTrialSource`] and the harness treats its counts
//! identically to the in-process sampler.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod harness;
mod result;
mod strategy;
mod types;

// Functional modules
pub mod analysis;
pub mod output;
pub mod source;
pub mod statistics;
pub mod theory;

// Re-exports for the public API
pub use analysis::{Analyzer, SuccessPredicate, SuccessRateAnalyzer};
pub use config::Config;
pub use constants::{DEFAULT_SEED, DEFAULT_TOLERANCE, MAX_PARTIES};
pub use error::{HarnessError, Result};
pub use harness::ValidationHarness;
pub use result::{AnalysisReport, RunOutcome, RunReport, RunSummary};
pub use source::{FnTrialSource, ParityTrialSource, TrialSource};
pub use statistics::{summarize, RateAccumulator, RateSummary};
pub use strategy::ParityStrategy;
pub use theory::{ComparisonReport, TheoreticalProfile, TheoryComparator};
pub use types::{Color, Configuration, FrequencyTable, GuessVector, JobRecord, OutcomeKey};
