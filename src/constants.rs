//! Shared constants and defaults.

/// Default seed for reproducible trial sources in tests and benchmarks.
pub const DEFAULT_SEED: u64 = 0x5EED_CAFE_F00D_D00D;

/// Default number of jobs per validation run.
pub const DEFAULT_JOBS: usize = 1000;

/// Default number of shots (independent trials) per job.
pub const DEFAULT_SHOTS_PER_JOB: u64 = 1024;

/// Default number of parties in the parity game.
pub const DEFAULT_PARTIES: usize = 4;

/// Default absolute tolerance for theory-vs-observed bucket deviations
/// (2 percentage points).
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Default mass threshold above which a theoretically-impossible bucket is
/// flagged. Kept well below [`DEFAULT_TOLERANCE`]: any real mass in a zero
/// bucket indicates an inference bug, not sampling wobble.
pub const DEFAULT_ZERO_MASS_EPSILON: f64 = 0.005;

/// Maximum number of parties representable by the packed outcome key.
pub const MAX_PARTIES: usize = 32;
