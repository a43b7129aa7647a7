//! Batch Run Reports
//!
//! One entry per benchmark in execution order, plus aggregate counts.
//! Human rendering targets the terminal; the JSON schema is stable and
//! round-trips through serde.

use chrono::{DateTime, Utc};
use driftbench_core::{FailureTrace, Fingerprint, Measurement, RunOutcome, SandboxError};
use serde::{Deserialize, Serialize};

use crate::format::format_measurement;

/// Outcome category for one report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Timing succeeded.
    Measured,
    /// The benchmarked code failed; the trace was captured.
    Failed,
    /// Setup, cleanup, or the definition itself failed and the benchmark
    /// was abandoned.
    Aborted,
}

/// Report line for one benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    /// Display name.
    pub name: String,
    /// Content identity of the definition.
    pub fingerprint: Fingerprint,
    /// Outcome category.
    pub status: EntryStatus,
    /// Measurement, present when `status` is `measured`.
    pub measurement: Option<Measurement>,
    /// Failure diagnostic, present otherwise.
    pub failure: Option<FailureTrace>,
}

impl RunEntry {
    /// Entry for a completed sandbox run.
    pub fn from_outcome(
        name: impl Into<String>,
        fingerprint: Fingerprint,
        outcome: RunOutcome,
    ) -> Self {
        match outcome {
            RunOutcome::Measured(measurement) => Self {
                name: name.into(),
                fingerprint,
                status: EntryStatus::Measured,
                measurement: Some(measurement),
                failure: None,
            },
            RunOutcome::Failed(trace) => Self {
                name: name.into(),
                fingerprint,
                status: EntryStatus::Failed,
                measurement: None,
                failure: Some(trace),
            },
        }
    }

    /// Entry for a run the sandbox aborted.
    ///
    /// The message keeps the error's phase prefix ("setup failed: ...") so
    /// the report reads without the error value in hand.
    pub fn from_abort(
        name: impl Into<String>,
        fingerprint: Fingerprint,
        error: &SandboxError,
    ) -> Self {
        let failure = FailureTrace {
            message: error.to_string(),
            backtrace: error.trace().and_then(|trace| trace.backtrace.clone()),
        };
        Self {
            name: name.into(),
            fingerprint,
            status: EntryStatus::Aborted,
            measurement: None,
            failure: Some(failure),
        }
    }
}

/// Aggregate counts over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Entries in the report.
    pub total: usize,
    /// Successfully measured.
    pub measured: usize,
    /// Captured code failures.
    pub failed: usize,
    /// Abandoned by sandbox errors.
    pub aborted: usize,
}

/// Full results of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Per-benchmark entries, in execution order.
    pub entries: Vec<RunEntry>,
    /// Status counts.
    pub summary: RunSummary,
}

impl RunReport {
    /// Build a report over `entries`, computing the summary.
    pub fn new(entries: Vec<RunEntry>) -> Self {
        let mut summary = RunSummary {
            total: entries.len(),
            ..RunSummary::default()
        };
        for entry in &entries {
            match entry.status {
                EntryStatus::Measured => summary.measured += 1,
                EntryStatus::Failed => summary.failed += 1,
                EntryStatus::Aborted => summary.aborted += 1,
            }
        }
        Self {
            generated_at: Utc::now(),
            entries,
            summary,
        }
    }

    /// Whether every entry was measured.
    pub fn all_measured(&self) -> bool {
        self.summary.measured == self.summary.total
    }
}

/// Render a report for terminal display.
pub fn render_human(report: &RunReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("Benchmark Results\n");
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");

    for entry in &report.entries {
        let icon = match entry.status {
            EntryStatus::Measured => "✓",
            EntryStatus::Failed => "✗",
            EntryStatus::Aborted => "!",
        };
        out.push_str(&format!(
            "{} {} [{}]\n",
            icon,
            entry.name,
            entry.fingerprint.short()
        ));
        match (&entry.measurement, &entry.failure) {
            (Some(measurement), _) => {
                out.push_str(&format!("    {}\n", format_measurement(measurement)));
            }
            (None, Some(failure)) => {
                for line in failure.text().lines().take(8) {
                    out.push_str(&format!("    {line}\n"));
                }
            }
            (None, None) => {}
        }
        out.push('\n');
    }

    out.push_str("Summary\n");
    out.push_str(&"-".repeat(60));
    out.push('\n');
    out.push_str(&format!(
        "  Measured: {}  Failed: {}  Aborted: {}\n",
        report.summary.measured, report.summary.failed, report.summary.aborted
    ));
    out
}

/// Generate a prettified JSON report.
pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
