//! Integration tests for Driftbench
//!
//! These tests verify the end-to-end behavior of the timing system: from
//! benchmark declaration through sandboxed measurement to recorded history
//! and rendered reports.

use driftbench::prelude::*;
use driftbench::{
    fetch_results, render_human, render_json, DriftConfig, EntryStatus, HistoryStore, ManualClock,
    MemoryStore, RunReport, TimeUnit,
};
use std::time::Duration;

fn quiet() -> DriftConfig {
    let mut config = DriftConfig::default();
    config.runner.progress = false;
    config
}

/// A snippet that advances the shared manual clock on every call.
fn costing(clock: &ManualClock, source: &str, cost: Duration) -> Snippet {
    let handle = clock.clone();
    Snippet::new(source, move |_| {
        handle.advance(cost);
        Ok(())
    })
}

fn run_quiet(clock: &ManualClock, ns: &Namespace) -> RunReport {
    Runner::with_sandbox(Sandbox::with_clock(Env::new(), clock.clone()))
        .with_config(quiet())
        .run(ns)
}

fn run_recorded_quiet(clock: &ManualClock, ns: &Namespace, store: &mut MemoryStore) -> RunReport {
    Runner::with_sandbox(Sandbox::with_clock(Env::new(), clock.clone()))
        .with_config(quiet())
        .run_recorded(ns, store)
}

/// Test a full measure-record-fetch cycle against the in-memory store
#[test]
fn test_measure_record_fetch_cycle() {
    let clock = ManualClock::new();
    let bench = Benchmark::new(
        costing(&clock, "window.sum()", Duration::from_millis(2)),
        costing(&clock, "window = build(1024)", Duration::from_millis(1)),
    )
    .with_name("windowed sum")
    .with_iterations(10);

    let ns = namespace! { "windowed" => bench };
    let mut store = MemoryStore::new();

    let report = Runner::with_sandbox(Sandbox::with_clock(Env::new(), clock.clone()))
        .with_config(quiet())
        .run_recorded(&ns, &mut store);

    assert!(report.all_measured());
    let entry = &report.entries[0];
    let measurement = entry.measurement.as_ref().unwrap();

    // Sandbox timing is always reported in milliseconds.
    assert_eq!(measurement.unit, TimeUnit::Millis);
    assert_eq!(measurement.loops, 10);
    assert!((measurement.timing - 2.0).abs() < 1e-9);

    // The stored series is reachable through the benchmark definition.
    let lookup = Benchmark::new(
        costing(&clock, "window.sum()", Duration::ZERO),
        costing(&clock, "window = build(1024)", Duration::ZERO),
    );
    let record = fetch_results(&lookup, &store).unwrap().expect("history");
    assert_eq!(record.fingerprint, entry.fingerprint);
    assert_eq!(record.timing.len(), 1);
    assert!((record.timing.points()[0].millis - 2.0).abs() < 1e-9);
}

/// Test that renaming a benchmark keeps its history reachable
#[test]
fn test_rename_keeps_history() {
    let clock = ManualClock::new();
    let mut store = MemoryStore::new();

    let original = Benchmark::new(
        costing(&clock, "stable()", Duration::from_millis(1)),
        Snippet::empty(),
    )
    .with_name("old name")
    .with_iterations(5);
    let ns = namespace! { "v1" => original };
    run_recorded_quiet(&clock, &ns, &mut store);

    let renamed = Benchmark::new(
        costing(&clock, "stable()", Duration::from_millis(1)),
        Snippet::empty(),
    )
    .with_name("brand new name")
    .with_iterations(5);
    let ns = namespace! { "v2" => renamed };
    let report = run_recorded_quiet(&clock, &ns, &mut store);

    // Same content, same fingerprint, one shared series with two points.
    assert_eq!(store.len(), 1);
    let record = store
        .results_for(&report.entries[0].fingerprint)
        .unwrap()
        .expect("record");
    assert_eq!(record.timing.len(), 2);
}

/// Test that a failing benchmark is isolated and still cleaned up
#[test]
fn test_failure_isolation_with_cleanup() {
    let clock = ManualClock::new();
    let cleaned = std::rc::Rc::new(std::cell::Cell::new(false));
    let flag = cleaned.clone();

    let failing = Benchmark::new(
        Snippet::new("broken()", |_| Err(SnippetError::new("resource gone"))),
        Snippet::empty(),
    )
    .with_iterations(1)
    .with_name("fails")
    .with_cleanup(Snippet::new("teardown()", move |_| {
        flag.set(true);
        Ok(())
    }));

    let ns = namespace! {
        "ok1" => Benchmark::new(costing(&clock, "a()", Duration::from_millis(1)), Snippet::empty())
            .with_iterations(5).with_name("ok1"),
        "bad" => failing,
        "ok2" => Benchmark::new(costing(&clock, "b()", Duration::from_millis(1)), Snippet::empty())
            .with_iterations(5).with_name("ok2"),
    };

    let report = run_quiet(&clock, &ns);

    let statuses: Vec<EntryStatus> = report.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        [
            EntryStatus::Measured,
            EntryStatus::Failed,
            EntryStatus::Measured
        ]
    );
    assert!(cleaned.get(), "cleanup must run for the failed benchmark");

    let failure = report.entries[1].failure.as_ref().unwrap();
    assert!(failure.message.contains("resource gone"));
}

/// Test that suites flatten in declaration order through the runner
#[test]
fn test_suite_flattening_through_runner() {
    let clock = ManualClock::new();
    let make = |name: &str| {
        Benchmark::new(costing(&clock, name, Duration::from_millis(1)), Snippet::empty())
            .with_iterations(2)
            .with_name(name)
    };

    let inner = BenchmarkSuite::new().with(make("third"));
    let suite = BenchmarkSuite::new().with(make("second")).with(inner);
    let ns = namespace! {
        "first" => make("first"),
        "group" => suite,
        "settings" => serde_json::json!({ "threads": 1 }),
    };

    let report = run_quiet(&clock, &ns);
    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["first", "second", "third"]);
}

/// Test human and JSON rendering of a mixed report
#[test]
fn test_report_rendering() {
    let clock = ManualClock::new();
    let ns = namespace! {
        "good" => Benchmark::new(costing(&clock, "fine()", Duration::from_millis(1)), Snippet::empty())
            .with_iterations(4).with_name("good"),
        "bad" => Benchmark::new(Snippet::new("nope()", |_| Err("sky fell".into())), Snippet::empty())
            .with_iterations(1).with_name("bad"),
    };

    let report = run_quiet(&clock, &ns);

    let human = render_human(&report);
    assert!(human.contains("✓ good"));
    assert!(human.contains("✗ bad"));
    assert!(human.contains("sky fell"));
    assert!(human.contains("per loop"));

    let json = render_json(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["measured"], 1);
    assert_eq!(value["summary"]["failed"], 1);
    assert_eq!(value["entries"][0]["status"], "measured");
    assert_eq!(value["entries"][1]["status"], "failed");
    // Fingerprints serialize as 64-digit hex strings.
    let fp = value["entries"][0]["fingerprint"].as_str().unwrap();
    assert_eq!(fp.len(), 64);
}

/// Test adaptive calibration end to end with a scripted clock
#[test]
fn test_adaptive_calibration_end_to_end() {
    // 30ms per call: calibration needs 10 loops to cross the 100ms window.
    let clock = ManualClock::new();
    let bench = Benchmark::new(
        costing(&clock, "chunk()", Duration::from_millis(30)),
        Snippet::empty(),
    )
    .with_name("calibrated");

    let ns = namespace! { "auto" => bench };
    let report = run_quiet(&clock, &ns);

    let measurement = report.entries[0].measurement.as_ref().unwrap();
    assert_eq!(measurement.loops, 10);
    assert_eq!(measurement.repeat, 3);
    // 30ms per loop regardless of the chosen loop count.
    assert!((measurement.timing - 30.0).abs() < 1e-9);
}

/// Test profiling through the sandbox
#[test]
fn test_profile_through_sandbox() {
    let clock = ManualClock::new();
    let sandbox = Sandbox::with_clock(Env::new(), clock.clone());
    let bench = Benchmark::new(
        costing(&clock, "hot()", Duration::from_millis(7)),
        Snippet::empty(),
    )
    .with_name("hot path");

    let profile = sandbox.profile(&bench, 3).unwrap();
    let table = driftbench::format_profile(&profile);

    assert_eq!(profile.frames()[0].calls, 3);
    assert_eq!(profile.frames()[0].cumulative, Duration::from_millis(21));
    assert!(table.contains("hot path"));
}
