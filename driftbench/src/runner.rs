//! Sequential Batch Runner
//!
//! Flattens a namespace and drives each benchmark through the sandbox, one
//! at a time. Measurement stays strictly sequential: concurrent trials
//! would contend for the CPU and corrupt each other's numbers.

use crate::config::DriftConfig;
use chrono::Utc;
use driftbench_core::{pin_to_cpu, Benchmark, Clock, Env, MonotonicClock, Namespace, Sandbox};
use driftbench_history::{HistoryStore, SeriesPoint};
use driftbench_report::{RunEntry, RunReport};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

/// Runs batches of benchmarks and reports per-entry outcomes.
///
/// One failing benchmark never stops the batch: code failures come back
/// captured in their entry, and sandbox errors abort only the entry they
/// hit.
pub struct Runner<C: Clock = MonotonicClock> {
    sandbox: Sandbox<C>,
    config: DriftConfig,
}

impl Runner<MonotonicClock> {
    /// Runner over the system clock, seeded with `base` bindings.
    pub fn new(base: Env) -> Self {
        Self::with_sandbox(Sandbox::new(base))
    }
}

impl<C: Clock> Runner<C> {
    /// Runner over an existing sandbox, with default configuration.
    ///
    /// Use [`DriftConfig::discover`] with [`Runner::with_config`] to pick
    /// up a drift.toml.
    pub fn with_sandbox(sandbox: Sandbox<C>) -> Self {
        Self {
            sandbox,
            config: DriftConfig::default(),
        }
    }

    /// Replace the runner configuration.
    pub fn with_config(mut self, config: DriftConfig) -> Self {
        self.config = config;
        self
    }

    /// The sandbox benchmarks run in.
    pub fn sandbox(&self) -> &Sandbox<C> {
        &self.sandbox
    }

    /// Run every benchmark in `namespace`, in declaration order.
    pub fn run(&self, namespace: &Namespace) -> RunReport {
        self.run_with_store(namespace, None)
    }

    /// Run every benchmark and append successful timings to `store`.
    ///
    /// Each success is recorded as a point in milliseconds under the
    /// benchmark's fingerprint. A store write failure is logged and leaves
    /// the entry's status untouched.
    pub fn run_recorded(&self, namespace: &Namespace, store: &mut dyn HistoryStore) -> RunReport {
        self.run_with_store(namespace, Some(store))
    }

    fn run_with_store(
        &self,
        namespace: &Namespace,
        mut store: Option<&mut dyn HistoryStore>,
    ) -> RunReport {
        if let Some(cpu) = self.config.runner.pin_cpu {
            if let Err(error) = pin_to_cpu(cpu) {
                warn!(cpu, %error, "could not pin runner thread");
            }
        }

        let benchmarks = namespace.benchmarks();
        info!(count = benchmarks.len(), "running benchmark batch");

        let progress = self.make_progress(benchmarks.len() as u64);
        let mut entries = Vec::with_capacity(benchmarks.len());

        for benchmark in benchmarks {
            let name = benchmark.label();
            if let Some(pb) = &progress {
                pb.set_message(name.clone());
            }

            entries.push(self.run_one(benchmark, &name, store.as_deref_mut()));

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Complete");
        }

        RunReport::new(entries)
    }

    fn run_one(
        &self,
        benchmark: &Benchmark,
        name: &str,
        store: Option<&mut (dyn HistoryStore + '_)>,
    ) -> RunEntry {
        let fingerprint = benchmark.fingerprint();
        match self.sandbox.run(benchmark) {
            Ok(outcome) => {
                if let (Some(store), Some(measurement)) = (store, outcome.measurement()) {
                    let point = SeriesPoint {
                        at: Utc::now(),
                        millis: measurement.millis_per_loop(),
                    };
                    if let Err(error) = store.record(&fingerprint, point) {
                        warn!(benchmark = name, %error, "failed to record history point");
                    }
                }
                RunEntry::from_outcome(name, fingerprint, outcome)
            }
            Err(error) => {
                warn!(benchmark = name, %error, "benchmark aborted");
                RunEntry::from_abort(name, fingerprint, &error)
            }
        }
    }

    fn make_progress(&self, len: u64) -> Option<ProgressBar> {
        if !self.config.runner.progress {
            return None;
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    }
}
