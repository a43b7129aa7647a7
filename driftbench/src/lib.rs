#![warn(missing_docs)]

//! # Driftbench
//!
//! Adaptive benchmark timing with content-addressed history.
//!
//! Driftbench measures code fragments the way an interactive timeit does,
//! then keeps the results comparable across runs:
//!
//! - **Adaptive calibration**: loop counts escalate tenfold until one trial
//!   lands in a measurable window
//! - **Best-of-N trials**: the minimum of repeated trials, not the mean,
//!   keeps scheduler noise out of the number
//! - **Content identity**: a benchmark is keyed by a digest of its setup,
//!   code, and cleanup text, so history survives renames
//! - **Guaranteed cleanup**: teardown runs whether or not the timed code
//!   failed, and failures are captured per entry so a batch keeps going
//! - **History and plots**: successful timings append to a per-fingerprint
//!   series that storage and plotting collaborators consume
//!
//! ## Quick Start
//!
//! ```
//! use driftbench::prelude::*;
//!
//! let bench = Benchmark::new(
//!     Snippet::new("total += 1", |env| {
//!         let total = env.get_i64("total").unwrap_or(0);
//!         env.set("total", total + 1);
//!         Ok(())
//!     }),
//!     Snippet::new("total = 0", |env| {
//!         env.set("total", 0);
//!         Ok(())
//!     }),
//! )
//! .with_name("counter increment")
//! .with_iterations(1000);
//!
//! let ns = namespace! { "counter" => bench };
//! let report = Runner::new(Env::new()).run(&ns);
//! assert!(report.all_measured());
//! ```

mod config;
mod runner;

pub use config::{DriftConfig, ReportSettings, RunnerSettings};
pub use runner::Runner;

// Core engine surface
pub use driftbench_core::{
    measure, pin_to_cpu, scale_timing, Benchmark, BenchmarkSuite, CallProfiler, Clock, Entry, Env,
    FailureTrace, Fingerprint, FrameStats, ManualClock, MeasureOptions, Measurement,
    MonotonicClock, Namespace, ProfileReport, RunOutcome, Sandbox, SandboxError, Snippet,
    SnippetError, SnippetResult, TimeUnit, TimingError,
};

// Collaborator surface
pub use driftbench_history::{
    HistoryRecord, HistoryStore, MemoryStore, PlotError, PlotHints, SeriesPlotter, SeriesPoint,
    StoreError, TimingSeries,
};

// Report surface
pub use driftbench_report::{
    benchmark_entry, format_failure, format_measurement, format_profile, render_human,
    render_json, EntryStatus, OutputFormat, RunEntry, RunReport, RunSummary,
};

/// Build a [`Namespace`] from `name => entry` pairs.
///
/// Entries can be benchmarks, suites, or arbitrary JSON values; discovery
/// keeps only the benchmarks.
///
/// ```
/// use driftbench::prelude::*;
///
/// let fast = Benchmark::new(Snippet::new("noop()", |_| Ok(())), Snippet::empty());
/// let ns = namespace! {
///     "fast" => fast,
///     "threads" => serde_json::json!(4),
/// };
/// assert_eq!(ns.benchmarks().len(), 1);
/// ```
#[macro_export]
macro_rules! namespace {
    ($($name:expr => $entry:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut ns = $crate::Namespace::new();
        $(ns.insert($name, $entry);)*
        ns
    }};
}

/// Prelude for benchmark declarations.
pub mod prelude {
    pub use crate::{
        namespace, Benchmark, BenchmarkSuite, Entry, Env, Namespace, Runner, Sandbox, Snippet,
        SnippetError,
    };
}

/// Initialize logging for benchmark binaries.
///
/// Opt-in: the library itself never installs a subscriber.
pub fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter("driftbench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("driftbench=info")
            .init();
    }
}

/// Fetch historical results for a benchmark from a store.
///
/// Looks up by fingerprint and returns the record untrimmed. Use
/// [`plot_benchmark`] when the benchmark's start date should apply.
pub fn fetch_results(
    benchmark: &Benchmark,
    store: &dyn HistoryStore,
) -> Result<Option<HistoryRecord>, StoreError> {
    store.results_for(&benchmark.fingerprint())
}

/// Plot a benchmark's history through a plotting collaborator.
///
/// Trims the series to the benchmark's start date and passes display hints
/// built from its metadata.
pub fn plot_benchmark(
    benchmark: &Benchmark,
    store: &dyn HistoryStore,
    plotter: &mut dyn SeriesPlotter,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let record = fetch_results(benchmark, store)
        .with_context(|| format!("loading history for {}", benchmark.label()))?
        .with_context(|| format!("no history recorded for {}", benchmark.label()))?;

    let series = match benchmark.start_date() {
        Some(start) => record.timing.truncate_before(start),
        None => record.timing,
    };

    let hints = PlotHints {
        title: Some(benchmark.label()),
        log_scale: benchmark.log_scale(),
        ..PlotHints::default()
    };

    plotter
        .plot(&series, &hints)
        .with_context(|| format!("plotting {}", benchmark.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dummy_bench(name: &str) -> Benchmark {
        Benchmark::new(Snippet::new("run()", |_| Ok(())), Snippet::empty()).with_name(name)
    }

    struct CapturingPlotter {
        series: Option<TimingSeries>,
        hints: Option<PlotHints>,
    }

    impl SeriesPlotter for CapturingPlotter {
        fn plot(&mut self, series: &TimingSeries, hints: &PlotHints) -> Result<(), PlotError> {
            self.series = Some(series.clone());
            self.hints = Some(hints.clone());
            Ok(())
        }
    }

    #[test]
    fn namespace_macro_builds_in_order() {
        let ns = namespace! {
            "b1" => dummy_bench("one"),
            "extra" => serde_json::json!("metadata"),
            "b2" => dummy_bench("two"),
        };
        let names: Vec<String> = ns.benchmarks().iter().map(|b| b.label()).collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn empty_namespace_macro_works() {
        let ns = namespace! {};
        assert!(ns.is_empty());
    }

    #[test]
    fn fetch_results_returns_none_without_history() {
        let store = MemoryStore::new();
        let result = fetch_results(&dummy_bench("fresh"), &store).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn plot_benchmark_trims_and_hints() {
        let bench = dummy_bench("windowed sum")
            .with_log_scale(true)
            .with_start_date(chrono::Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());

        let mut store = MemoryStore::new();
        let fp = bench.fingerprint();
        for (month, millis) in [(1, 10.0), (2, 9.0), (3, 8.0)] {
            store
                .record(
                    &fp,
                    SeriesPoint {
                        at: chrono::Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap(),
                        millis,
                    },
                )
                .unwrap();
        }

        let mut plotter = CapturingPlotter {
            series: None,
            hints: None,
        };
        plot_benchmark(&bench, &store, &mut plotter).unwrap();

        let series = plotter.series.expect("series passed");
        assert_eq!(series.len(), 2); // January point trimmed
        let hints = plotter.hints.expect("hints passed");
        assert_eq!(hints.title.as_deref(), Some("windowed sum"));
        assert!(hints.log_scale);
        assert_eq!(hints.axis_label, "milliseconds");
    }

    #[test]
    fn plot_benchmark_without_history_is_an_error() {
        let store = MemoryStore::new();
        let mut plotter = CapturingPlotter {
            series: None,
            hints: None,
        };
        let err = plot_benchmark(&dummy_bench("ghost"), &store, &mut plotter).unwrap_err();
        assert!(err.to_string().contains("no history recorded for ghost"));
    }
}
