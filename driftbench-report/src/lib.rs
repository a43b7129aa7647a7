#![warn(missing_docs)]

//! Driftbench Report - Result Presentation
//!
//! Output surfaces for measurements and batch runs:
//!
//! - The classic one-line timing summary
//! - reStructuredText blocks for embedding benchmarks in documentation
//! - Profile tables
//! - Batch run reports in human-readable and JSON form

mod format;
mod rst;
mod summary;

pub use format::{format_failure, format_measurement, format_profile};
pub use rst::benchmark_entry;
pub use summary::{render_human, render_json, EntryStatus, RunEntry, RunReport, RunSummary};

/// Output format for batch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with the full report schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
