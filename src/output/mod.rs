//! Human-readable and machine-readable rendering of run results.

pub mod json;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_comparison, format_report, format_trial};
