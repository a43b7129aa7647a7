//! Execution Sandbox
//!
//! Runs a benchmark inside a fresh environment cloned from an immutable
//! base. Setup failures abort the run before timing, code failures are
//! captured into the outcome so a batch can keep going, and cleanup runs
//! on every exit path once setup has succeeded.

use crate::benchmark::Benchmark;
use crate::clock::{Clock, MonotonicClock};
use crate::env::Env;
use crate::profiler::{CallProfiler, ProfileReport};
use crate::snippet::{Snippet, SnippetError};
use crate::timing::{measure, MeasureOptions, Measurement, TimingError};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;
use tracing::debug;

/// Structured diagnostic for a failed snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureTrace {
    /// What went wrong.
    pub message: String,
    /// Captured backtrace text, when the runtime provides one.
    pub backtrace: Option<String>,
}

impl FailureTrace {
    /// Trace from an error message, capturing a backtrace if enabled.
    pub fn new(message: impl Into<String>) -> Self {
        let backtrace = Backtrace::capture();
        let backtrace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self {
            message: message.into(),
            backtrace,
        }
    }

    /// Trace from a caught panic payload.
    pub fn from_panic(panic: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = panic.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        Self::new(message)
    }

    /// Full trace text: the message, plus the backtrace when present.
    pub fn text(&self) -> String {
        match &self.backtrace {
            Some(backtrace) => format!("{}\n{}", self.message, backtrace),
            None => self.message.clone(),
        }
    }
}

impl std::fmt::Display for FailureTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<SnippetError> for FailureTrace {
    fn from(error: SnippetError) -> Self {
        Self::new(error.to_string())
    }
}

/// Result of one sandboxed benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    /// Timing succeeded.
    Measured(Measurement),
    /// The benchmarked code failed; the diagnostic is captured here and the
    /// caller's batch may continue.
    Failed(FailureTrace),
}

impl RunOutcome {
    /// Whether the run produced a measurement.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Measured(_))
    }

    /// The measurement, when timing succeeded.
    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            RunOutcome::Measured(measurement) => Some(measurement),
            RunOutcome::Failed(_) => None,
        }
    }

    /// The failure trace, when the code failed.
    pub fn failure(&self) -> Option<&FailureTrace> {
        match self {
            RunOutcome::Measured(_) => None,
            RunOutcome::Failed(trace) => Some(trace),
        }
    }
}

/// Error fatal to the benchmark being run.
///
/// Captured code failures are not errors; they come back through
/// [`RunOutcome::Failed`]. These variants abort the individual benchmark
/// and leave the rest of the batch to the caller.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The definition cannot be measured as declared.
    #[error("invalid benchmark definition: {0}")]
    InvalidDefinition(String),
    /// Setup failed. No timing was attempted and cleanup does not run.
    #[error("setup failed: {0}")]
    Setup(FailureTrace),
    /// Profiled code failed. Only [`Sandbox::profile`] surfaces this;
    /// [`Sandbox::run`] captures execution failures into its outcome.
    #[error("execution failed: {0}")]
    Execution(FailureTrace),
    /// Cleanup failed after timing finished.
    #[error("cleanup failed: {0}")]
    Cleanup(FailureTrace),
}

impl SandboxError {
    /// The underlying trace, when one was captured.
    pub fn trace(&self) -> Option<&FailureTrace> {
        match self {
            SandboxError::InvalidDefinition(_) => None,
            SandboxError::Setup(trace)
            | SandboxError::Execution(trace)
            | SandboxError::Cleanup(trace) => Some(trace),
        }
    }
}

/// Executes benchmarks in isolated environments built from a fixed base.
///
/// The base environment is supplied once at construction and only ever
/// cloned; runs never observe each other's state.
pub struct Sandbox<C: Clock = MonotonicClock> {
    base: Env,
    clock: C,
}

impl Sandbox<MonotonicClock> {
    /// Sandbox over the system monotonic clock.
    pub fn new(base: Env) -> Self {
        Self::with_clock(base, MonotonicClock::new())
    }
}

impl<C: Clock> Sandbox<C> {
    /// Sandbox over a caller-supplied clock.
    pub fn with_clock(base: Env, clock: C) -> Self {
        Self { base, clock }
    }

    /// The base environment runs are seeded from.
    pub fn base(&self) -> &Env {
        &self.base
    }

    /// Measure a benchmark.
    ///
    /// Timing always reports milliseconds so historical series stay
    /// unit-stable. Code failures and panics come back captured in
    /// [`RunOutcome::Failed`]; setup and cleanup failures are fatal to this
    /// benchmark and return an error.
    pub fn run(&self, benchmark: &Benchmark) -> Result<RunOutcome, SandboxError> {
        validate(benchmark)?;
        let mut env = self.build_env(benchmark)?;

        let options = MeasureOptions {
            loops: benchmark.iterations(),
            repeat: benchmark.repeat(),
            force_millis: true,
        };
        let timed = catch_unwind(AssertUnwindSafe(|| {
            measure(&self.clock, &mut env, benchmark.code(), &options)
        }));
        let outcome = match timed {
            Ok(Ok(measurement)) => RunOutcome::Measured(measurement),
            Ok(Err(error)) => {
                debug!(benchmark = %benchmark.label(), %error, "captured execution failure");
                RunOutcome::Failed(trace_from_timing(error))
            }
            Err(panic) => {
                let trace = FailureTrace::from_panic(panic);
                debug!(benchmark = %benchmark.label(), message = %trace.message, "captured panic");
                RunOutcome::Failed(trace)
            }
        };

        self.run_snippet(benchmark.cleanup(), &mut env)
            .map_err(SandboxError::Cleanup)?;
        Ok(outcome)
    }

    /// Profile a benchmark: `loops` iterations inside one profiled frame.
    ///
    /// No calibration is applied, so `loops` must be explicit and nonzero.
    /// Cleanup is the caller's business here. Frames come back sorted by
    /// cumulative time, largest first.
    pub fn profile(&self, benchmark: &Benchmark, loops: u64) -> Result<ProfileReport, SandboxError> {
        if loops == 0 {
            return Err(SandboxError::InvalidDefinition(
                "profiling requires an iteration count of at least 1".to_string(),
            ));
        }
        let mut env = self.build_env(benchmark)?;

        let mut profiler = CallProfiler::new(&self.clock);
        let label = benchmark.label();
        let code = benchmark.code();
        let profiled = catch_unwind(AssertUnwindSafe(|| {
            profiler.record_batch(&label, loops, || {
                for _ in 0..loops {
                    code.run(&mut env)?;
                }
                Ok::<(), SnippetError>(())
            })
        }));
        match profiled {
            Ok(Ok(())) => Ok(profiler.finish()),
            Ok(Err(error)) => Err(SandboxError::Execution(FailureTrace::from(error))),
            Err(panic) => Err(SandboxError::Execution(FailureTrace::from_panic(panic))),
        }
    }

    /// Clone the base and run setup in the copy.
    fn build_env(&self, benchmark: &Benchmark) -> Result<Env, SandboxError> {
        let mut env = self.base.clone();
        self.run_snippet(benchmark.setup(), &mut env)
            .map_err(SandboxError::Setup)?;
        Ok(env)
    }

    /// Run one snippet, converting errors and panics into a trace.
    fn run_snippet(&self, snippet: &Snippet, env: &mut Env) -> Result<(), FailureTrace> {
        match catch_unwind(AssertUnwindSafe(|| snippet.run(env))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(FailureTrace::from(error)),
            Err(panic) => Err(FailureTrace::from_panic(panic)),
        }
    }
}

/// Reject definitions the timer would fail fast on, before touching state.
fn validate(benchmark: &Benchmark) -> Result<(), SandboxError> {
    if benchmark.iterations() == Some(0) {
        return Err(SandboxError::InvalidDefinition(
            "iteration count must be at least 1".to_string(),
        ));
    }
    if benchmark.repeat() == 0 {
        return Err(SandboxError::InvalidDefinition(
            "repeat count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Convert a timing error into a trace for capture.
fn trace_from_timing(error: TimingError) -> FailureTrace {
    match error {
        TimingError::Execution(err) => FailureTrace::from(err),
        other => FailureTrace::new(other.to_string()),
    }
}
