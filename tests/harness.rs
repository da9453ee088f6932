//! Harness-level behavior: partial results on failure, cancellation,
//! first-job pinning, and analyzer plumbing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trial_oracle::{
    Analyzer, FnTrialSource, FrequencyTable, HarnessError, JobRecord, ParityTrialSource,
    SuccessRateAnalyzer, TrialSource, ValidationHarness,
};

/// A source that succeeds `good_jobs` times, then fails.
struct FlakySource {
    inner: ParityTrialSource,
    good_jobs: usize,
    produced: usize,
}

impl FlakySource {
    fn new(parties: usize, seed: u64, good_jobs: usize) -> Self {
        Self {
            inner: ParityTrialSource::with_seed(parties, seed).unwrap(),
            good_jobs,
            produced: 0,
        }
    }
}

impl TrialSource for FlakySource {
    fn produce_job(&mut self, shots: u64) -> trial_oracle::Result<FrequencyTable> {
        if self.produced >= self.good_jobs {
            return Err(HarnessError::SourceFailure {
                job: self.produced,
                message: "backend connection dropped".into(),
            });
        }
        self.produced += 1;
        self.inner.produce_job(shots)
    }
}

#[test]
fn failure_on_third_job_preserves_two_ingested_jobs() {
    let mut source = FlakySource::new(4, 99, 2);
    let mut analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(SuccessRateAnalyzer::new())];

    let outcome = ValidationHarness::new()
        .jobs(5)
        .shots_per_job(128)
        .run(&mut source, &mut analyzers);

    match outcome.error() {
        Some(HarnessError::SourceFailure { job, .. }) => assert_eq!(*job, 2),
        other => panic!("expected SourceFailure, got {other:?}"),
    }

    let report = outcome.report();
    assert_eq!(report.summary.jobs_completed, 2);
    assert_eq!(report.aggregate.total_shots(), 256);
    let analysis = report.analyzer_reports[0].as_ref().unwrap();
    assert_eq!(analysis.total_jobs, 2);
    assert_eq!(analysis.job_rates.len(), 2);
}

#[test]
fn failure_before_any_job_reports_no_data() {
    let mut source = FlakySource::new(4, 7, 0);
    let mut analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(SuccessRateAnalyzer::new())];

    let outcome = ValidationHarness::new()
        .jobs(3)
        .shots_per_job(64)
        .run(&mut source, &mut analyzers);

    assert!(matches!(
        outcome.error(),
        Some(HarnessError::SourceFailure { job: 0, .. })
    ));
    let report = outcome.report();
    assert!(report.first_job.is_none());
    // "No data" is distinguishable from "partial data": the analyzer slot
    // is present but empty.
    assert_eq!(report.analyzer_reports.len(), 1);
    assert!(report.analyzer_reports[0].is_none());
}

#[test]
fn pre_set_cancellation_stops_before_the_first_job() {
    let flag = Arc::new(AtomicBool::new(true));
    let mut source = ParityTrialSource::with_seed(3, 21).unwrap();
    let mut analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(SuccessRateAnalyzer::new())];

    let outcome = ValidationHarness::new()
        .jobs(10)
        .shots_per_job(64)
        .cancel_flag(flag)
        .run(&mut source, &mut analyzers);

    assert!(!outcome.is_completed());
    assert!(outcome.error().is_none());
    assert_eq!(outcome.report().summary.jobs_completed, 0);
}

#[test]
fn mid_run_cancellation_keeps_partial_results() {
    let flag = Arc::new(AtomicBool::new(false));
    let trip = Arc::clone(&flag);

    // Trip the flag from inside the source after three jobs; the harness
    // must only observe it between jobs.
    let mut inner = ParityTrialSource::with_seed(4, 5).unwrap();
    let mut produced = 0usize;
    let mut source = FnTrialSource::new(move |shots| {
        produced += 1;
        if produced == 3 {
            trip.store(true, Ordering::Relaxed);
        }
        inner.produce_job(shots)
    });

    let mut analyzers: Vec<Box<dyn Analyzer>> = vec![Box::new(SuccessRateAnalyzer::new())];
    let outcome = ValidationHarness::new()
        .jobs(10)
        .shots_per_job(32)
        .cancel_flag(flag)
        .run(&mut source, &mut analyzers);

    assert!(!outcome.is_completed());
    assert!(outcome.error().is_none());
    let report = outcome.report();
    assert_eq!(report.summary.jobs_completed, 3);
    assert_eq!(
        report.analyzer_reports[0].as_ref().unwrap().total_jobs,
        3
    );
}

#[test]
fn first_job_table_is_job_zero() {
    let mut source = ParityTrialSource::with_seed(4, 1).unwrap();
    let mut check = ParityTrialSource::with_seed(4, 1).unwrap();
    let expected_first = check.produce_job(256).unwrap();

    let mut analyzers: Vec<Box<dyn Analyzer>> = Vec::new();
    let outcome = ValidationHarness::new()
        .jobs(4)
        .shots_per_job(256)
        .run(&mut source, &mut analyzers);

    assert_eq!(outcome.report().first_job.as_ref(), Some(&expected_first));
}

#[test]
fn every_analyzer_sees_every_job() {
    /// Minimal analyzer counting ingestions, to exercise pluggability.
    struct JobCounter {
        jobs: Vec<usize>,
    }

    impl Analyzer for JobCounter {
        fn ingest(&mut self, job: &JobRecord) -> trial_oracle::Result<()> {
            self.jobs.push(job.index);
            Ok(())
        }

        fn report(&self) -> trial_oracle::Result<trial_oracle::AnalysisReport> {
            Err(HarnessError::EmptyHistory)
        }

        fn reset(&mut self) {
            self.jobs.clear();
        }
    }

    let mut source = ParityTrialSource::with_seed(2, 11).unwrap();
    let mut analyzers: Vec<Box<dyn Analyzer>> = vec![
        Box::new(SuccessRateAnalyzer::new()),
        Box::new(JobCounter { jobs: Vec::new() }),
    ];

    let outcome = ValidationHarness::new()
        .jobs(6)
        .shots_per_job(16)
        .run(&mut source, &mut analyzers);

    assert!(outcome.is_completed());
    assert_eq!(
        outcome.report().analyzer_reports[0]
            .as_ref()
            .unwrap()
            .total_jobs,
        6
    );
    // The counter never produces a report, but the slot is still present.
    assert!(outcome.report().analyzer_reports[1].is_none());
}

#[test]
fn aggregate_equals_merge_of_job_tables() {
    let mut source = ParityTrialSource::with_seed(3, 77).unwrap();
    let mut replay = ParityTrialSource::with_seed(3, 77).unwrap();

    let mut analyzers: Vec<Box<dyn Analyzer>> = Vec::new();
    let outcome = ValidationHarness::new()
        .jobs(3)
        .shots_per_job(100)
        .run(&mut source, &mut analyzers);

    let mut expected = FrequencyTable::new();
    for _ in 0..3 {
        expected.merge(&replay.produce_job(100).unwrap());
    }
    assert_eq!(outcome.report().aggregate, expected);
}
