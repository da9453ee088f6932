//! JSON serialization for run reports.

use crate::result::RunOutcome;

/// Serialize a run outcome to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `RunOutcome`).
pub fn to_json(outcome: &RunOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string(outcome)
}

/// Serialize a run outcome to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `RunOutcome`).
pub fn to_json_pretty(outcome: &RunOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outcome)
}
