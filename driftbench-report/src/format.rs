//! Human-Readable Formatting
//!
//! The one-line timing summary keeps the shape interactive timeit users
//! expect: loop count, trial count, best time with three significant
//! digits, unit.

use driftbench_core::{FailureTrace, Measurement, ProfileReport};

/// Format a value with three significant digits.
fn significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}

/// One-line measurement summary:
/// `10000 loops, best of 3: 53.3 ns per loop`.
pub fn format_measurement(measurement: &Measurement) -> String {
    format!(
        "{} loops, best of {}: {} {} per loop",
        measurement.loops,
        measurement.repeat,
        significant(measurement.timing),
        measurement.unit,
    )
}

/// One-line summary of a captured failure.
pub fn format_failure(trace: &FailureTrace) -> String {
    format!("failed: {}", trace.message)
}

/// Render a profile as an aligned table, hottest frame first.
pub fn format_profile(profile: &ProfileReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>10}  {:>14}  {:>14}  name\n",
        "calls", "cumulative", "per call"
    ));
    for frame in profile.frames() {
        out.push_str(&format!(
            "{:>10}  {:>12.3}ms  {:>12.4}ms  {}\n",
            frame.calls,
            frame.cumulative.as_secs_f64() * 1e3,
            frame.per_call().as_secs_f64() * 1e3,
            frame.name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbench_core::{CallProfiler, ManualClock, TimeUnit};
    use std::time::Duration;

    #[test]
    fn measurement_line_matches_timeit_shape() {
        let m = Measurement {
            loops: 10000,
            repeat: 3,
            timing: 53.2786,
            unit: TimeUnit::Nanos,
        };
        assert_eq!(
            format_measurement(&m),
            "10000 loops, best of 3: 53.3 ns per loop"
        );
    }

    #[test]
    fn three_significant_digits() {
        assert_eq!(significant(184.21), "184");
        assert_eq!(significant(53.2786), "53.3");
        assert_eq!(significant(5.0), "5.00");
        assert_eq!(significant(0.5), "0.500");
        assert_eq!(significant(0.0), "0");
    }

    #[test]
    fn forced_millis_format_keeps_unit() {
        let m = Measurement {
            loops: 1,
            repeat: 3,
            timing: 2000.0,
            unit: TimeUnit::Millis,
        };
        assert_eq!(
            format_measurement(&m),
            "1 loops, best of 3: 2000 ms per loop"
        );
    }

    #[test]
    fn failure_line_carries_message() {
        let trace = FailureTrace {
            message: "table missing".to_string(),
            backtrace: None,
        };
        assert_eq!(format_failure(&trace), "failed: table missing");
    }

    #[test]
    fn profile_table_lists_frames_hottest_first() {
        let clock = ManualClock::new();
        let mut profiler = CallProfiler::new(&clock);
        profiler.record("slow", || clock.advance(Duration::from_millis(30)));
        profiler.record("fast", || clock.advance(Duration::from_millis(10)));

        let table = format_profile(&profiler.finish());
        let slow_at = table.find("slow").unwrap();
        let fast_at = table.find("fast").unwrap();
        assert!(slow_at < fast_at);
        assert!(table.starts_with("     calls"));
        assert!(table.contains("30.000ms"));
    }
}
