//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::RunReport;
use crate::strategy::ParityStrategy;
use crate::theory::ComparisonReport;
use crate::types::{Configuration, GuessVector};

/// Format a run report for human-readable terminal output.
pub fn format_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(
        &"VALIDATION RUN".bold().to_string(),
    ));
    output.push_str(&format_box_separator());

    let summary = &report.summary;
    output.push_str(&format_box_line(&format!(
        "Jobs: {} x {} shots ({} total)",
        summary.jobs_completed, summary.shots_per_job, summary.total_shots
    )));
    output.push_str(&format_box_line(&format!(
        "Elapsed: {:.3} s  ({:.0} shots/s)",
        summary.elapsed_secs, summary.shots_per_second
    )));
    output.push_str(&format_box_line(&format!(
        "Distinct outcomes: {}",
        report.aggregate.distinct_outcomes()
    )));

    for (index, analysis) in report.analyzer_reports.iter().enumerate() {
        output.push_str(&format_box_separator());
        match analysis {
            Some(analysis) => {
                let s = &analysis.summary;
                output.push_str(&format_box_line(&format!(
                    "Analyzer {index}: mean {:.4}  std {:.4}",
                    s.mean, s.std_dev
                )));
                output.push_str(&format_box_line(&format!(
                    "  min {:.4}  max {:.4}  over {} jobs",
                    s.min, s.max, analysis.total_jobs
                )));
            }
            None => {
                output.push_str(&format_box_line(
                    &format!("Analyzer {index}: no data").dimmed().to_string(),
                ));
            }
        }
    }

    output.push_str(&format_box_bottom());
    output
}

/// Format a theory comparison for terminal output.
pub fn format_comparison(comparison: &ComparisonReport) -> String {
    let mut output = String::new();

    let header = if comparison.exceeds_tolerance || comparison.impossible_mass {
        format!(
            "{} {}",
            "\u{26A0}".yellow().bold(),
            "DEVIATES FROM THEORY".red().bold()
        )
    } else {
        format!("{} {}", "\u{2713}".green().bold(), "MATCHES THEORY".green().bold())
    };

    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_separator());

    output.push_str(&format_box_line(&format!(
        "Max deviation: {:.4} (tolerance {:.4})",
        comparison.max_deviation, comparison.tolerance
    )));
    for (bucket, deviation) in comparison.deviations.iter().enumerate() {
        if *deviation > 0.0 {
            output.push_str(&format_box_line(&format!(
                "  {bucket} correct: |obs - exp| = {deviation:.4}"
            )));
        }
    }
    if comparison.impossible_mass {
        output.push_str(&format_box_line(
            &"Mass observed in a zero-probability bucket"
                .red()
                .to_string(),
        ));
    }

    output.push_str(&format_box_bottom());
    output
}

/// Format a single-trial walkthrough: each party's color, guess, and verdict.
pub fn format_trial(config: &Configuration, guesses: &GuessVector) -> String {
    let mut output = String::new();
    let score = ParityStrategy::score(config, guesses);

    for (party, ((color, guess), correct)) in config
        .colors()
        .iter()
        .zip(guesses.guesses())
        .zip(&score)
        .enumerate()
    {
        let verdict = if *correct {
            "\u{2713}".green().to_string()
        } else {
            "\u{2717}".red().to_string()
        };
        // Parties are lettered A, B, C... like the worked examples.
        let name = char::from(b'A' + (party % 26) as u8);
        output.push_str(&format!(
            "Party {name}: actual={color}, guess={guess} {verdict}\n"
        ));
    }

    let correct = score.iter().filter(|&&c| c).count();
    output.push_str(&format!("Correct: {correct}/{}\n", config.len()));
    output
}

// Box drawing helpers

const BOX_WIDTH: usize = 56;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    // Strip ANSI codes for length calculation
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = (BOX_WIDTH - 2).saturating_sub(visible_len);
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for accurate length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
