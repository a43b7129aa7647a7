//! Driftbench Example Benchmarks
//!
//! Declares a small benchmark namespace, runs it with history recording,
//! and prints the human report plus the recorded series.
//!
//! Run with:
//!   cargo run --example benchmarks               # Run the suite
//!   cargo run --example benchmarks -- --verbose  # With debug logging

use driftbench::prelude::*;
use driftbench::{fetch_results, init_logging, render_human, DriftConfig, MemoryStore};
use std::hint::black_box;

// ============================================================================
// Benchmark Declarations
// ============================================================================

/// Adaptive calibration picks the loop count for this one.
fn vector_sum() -> Benchmark {
    Benchmark::new(
        Snippet::new("total = sum(values)", |env| {
            let values = env
                .get("values")
                .and_then(|v| v.as_array())
                .ok_or(SnippetError::new("values unbound"))?;
            let total: i64 = values.iter().filter_map(|v| v.as_i64()).sum();
            env.set("total", black_box(total));
            Ok(())
        }),
        Snippet::new("values = 0..1000", |env| {
            env.set("values", (0..1000).collect::<Vec<i64>>());
            Ok(())
        }),
    )
    .with_name("vector sum")
    .with_description("Sums a thousand integers bound by setup")
}

/// Explicit loop count, no calibration.
fn counter_increment() -> Benchmark {
    Benchmark::new(
        Snippet::new("count += 1", |env| {
            let count = env.get_i64("count").unwrap_or(0);
            env.set("count", count + 1);
            Ok(())
        }),
        Snippet::new("count = 0", |env| {
            env.set("count", 0);
            Ok(())
        }),
    )
    .with_name("counter increment")
    .with_iterations(100_000)
}

/// Fails on purpose: the batch keeps going and the report shows the trace.
fn missing_input() -> Benchmark {
    Benchmark::new(
        Snippet::new("rows.load()", |env| {
            env.get("rows")
                .map(|_| ())
                .ok_or(SnippetError::new("rows unbound"))
        }),
        Snippet::empty(),
    )
    .with_name("missing input")
    .with_iterations(1)
}

// ============================================================================
// Runner
// ============================================================================

fn main() {
    init_logging(std::env::args().any(|arg| arg == "--verbose"));

    let collections = BenchmarkSuite::new().with(vector_sum());
    let ns = namespace! {
        "counter" => counter_increment(),
        "collections" => collections,
        "broken" => missing_input(),
        "threads" => serde_json::json!(1),
    };

    let config = DriftConfig::discover().unwrap_or_default();
    let runner = Runner::new(Env::new()).with_config(config);

    let mut store = MemoryStore::new();
    let report = runner.run_recorded(&ns, &mut store);
    print!("{}", render_human(&report));

    println!("\nRecorded history:");
    for bench in ns.benchmarks() {
        if let Ok(Some(record)) = fetch_results(bench, &store) {
            let latest = record.timing.latest().map(|p| p.millis).unwrap_or_default();
            println!(
                "  {} [{}]: {} point(s), latest {:.4} ms",
                bench.label(),
                record.fingerprint.short(),
                record.timing.len(),
                latest
            );
        }
    }
}
