#![warn(missing_docs)]

//! Driftbench Core - Timing Engine
//!
//! The measurement machinery behind driftbench:
//!
//! - **Adaptive calibration**: loop counts escalate tenfold until a single
//!   trial lands in a measurable window, then the best of N trials wins
//! - **Content identity**: a benchmark is keyed by a digest of its setup,
//!   code, and cleanup source text, so history survives renames
//! - **Sandboxed execution**: every run gets a fresh environment cloned from
//!   an immutable base, cleanup runs on every exit path after setup, and
//!   code failures are captured instead of tearing down the batch
//! - **Call-frame profiling**: cumulative wall time per named frame for
//!   diagnosing where a benchmark spends its time
//! - **Discovery**: namespaces and nested suites flatten into an ordered
//!   list of benchmarks, skipping everything that is not one

mod benchmark;
mod clock;
mod env;
mod fingerprint;
mod profiler;
mod sandbox;
mod snippet;
mod suite;
mod timing;

pub use benchmark::Benchmark;
pub use clock::{pin_to_cpu, Clock, ManualClock, MonotonicClock};
pub use env::Env;
pub use fingerprint::{Fingerprint, ParseFingerprintError};
pub use profiler::{CallProfiler, FrameStats, ProfileReport};
pub use sandbox::{FailureTrace, RunOutcome, Sandbox, SandboxError};
pub use snippet::{Snippet, SnippetError, SnippetResult};
pub use suite::{BenchmarkSuite, Entry, Namespace};
pub use timing::{
    measure, scale_timing, MeasureOptions, Measurement, TimeUnit, TimingError,
    CALIBRATION_THRESHOLD, DEFAULT_REPEAT,
};
