//! Adaptive Timing
//!
//! Chooses a loop count so one trial lands in a measurable window, takes
//! the best of several trials, and scales the per-iteration time into a
//! display unit. Calibration follows the classic timeit escalation: start
//! at one iteration and grow tenfold until a trial crosses the threshold.

use crate::clock::Clock;
use crate::env::Env;
use crate::snippet::{Snippet, SnippetError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Single-trial wall time a calibrated loop count must reach.
pub const CALIBRATION_THRESHOLD: Duration = Duration::from_millis(100);

/// Escalation factor between calibration attempts.
const CALIBRATION_GROWTH: u64 = 10;

/// Maximum calibration attempts: the initial size plus nine escalations.
const CALIBRATION_ATTEMPTS: u32 = 10;

/// Default number of timed trials per measurement.
pub const DEFAULT_REPEAT: u32 = 3;

/// Error from the timing engine.
#[derive(Debug, Error)]
pub enum TimingError {
    /// An explicit loop count of zero was requested.
    #[error("iteration count must be at least 1")]
    ZeroLoops,
    /// A repeat count of zero was requested.
    #[error("repeat count must be at least 1")]
    ZeroRepeat,
    /// The code under measurement returned an error.
    #[error("benchmarked code failed: {0}")]
    Execution(#[from] SnippetError),
}

/// Display unit for a per-iteration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Seconds
    #[serde(rename = "s")]
    Seconds,
    /// Milliseconds
    #[serde(rename = "ms")]
    Millis,
    /// Microseconds
    #[serde(rename = "us")]
    Micros,
    /// Nanoseconds
    #[serde(rename = "ns")]
    Nanos,
}

impl TimeUnit {
    /// Units from largest to smallest.
    const DESCENDING: [TimeUnit; 4] = [
        TimeUnit::Seconds,
        TimeUnit::Millis,
        TimeUnit::Micros,
        TimeUnit::Nanos,
    ];

    /// Scale factor from seconds into this unit.
    pub fn per_second(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Millis => 1e3,
            TimeUnit::Micros => 1e6,
            TimeUnit::Nanos => 1e9,
        }
    }

    /// Display suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "us",
            TimeUnit::Nanos => "ns",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Normalized result of a successful measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Iterations per trial.
    pub loops: u64,
    /// Trials taken.
    pub repeat: u32,
    /// Best per-iteration time, scaled into `unit`.
    pub timing: f64,
    /// Unit `timing` is expressed in.
    pub unit: TimeUnit,
}

impl Measurement {
    /// Best per-iteration time in seconds, unscaled.
    pub fn seconds_per_loop(&self) -> f64 {
        self.timing / self.unit.per_second()
    }

    /// Best per-iteration time in milliseconds.
    pub fn millis_per_loop(&self) -> f64 {
        self.seconds_per_loop() * 1e3
    }
}

/// Tuning knobs for one measurement.
#[derive(Debug, Clone)]
pub struct MeasureOptions {
    /// Explicit loop count; calibrated when absent.
    pub loops: Option<u64>,
    /// Number of trials to take the best of.
    pub repeat: u32,
    /// Report milliseconds regardless of magnitude.
    pub force_millis: bool,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            loops: None,
            repeat: DEFAULT_REPEAT,
            force_millis: false,
        }
    }
}

/// Run one trial: `loops` invocations of `code`, timed as a block.
fn run_trial<C: Clock>(
    clock: &C,
    env: &mut Env,
    code: &Snippet,
    loops: u64,
) -> Result<Duration, TimingError> {
    let start = clock.now();
    for _ in 0..loops {
        code.run(env)?;
    }
    Ok(clock.now().saturating_sub(start))
}

/// Escalate the loop count tenfold until one trial crosses `threshold`.
///
/// Returns the first size that crossed, or the last size attempted when the
/// attempt limit is reached first.
fn calibrate<C: Clock>(
    clock: &C,
    env: &mut Env,
    code: &Snippet,
    threshold: Duration,
    attempts: u32,
) -> Result<u64, TimingError> {
    let mut loops: u64 = 1;
    for attempt in 1..=attempts {
        let elapsed = run_trial(clock, env, code, loops)?;
        debug!(
            attempt,
            loops,
            elapsed_us = elapsed.as_micros() as u64,
            "calibration trial"
        );
        if elapsed >= threshold {
            break;
        }
        if attempt < attempts {
            loops *= CALIBRATION_GROWTH;
        }
    }
    Ok(loops)
}

/// Measure `code` against `env` with the given options.
///
/// Calibrates the loop count when [`MeasureOptions::loops`] is `None`, then
/// takes the minimum of `repeat` trials and scales the per-iteration time
/// with [`scale_timing`]. The environment is reused across every iteration
/// and trial, so mutations accumulate.
pub fn measure<C: Clock>(
    clock: &C,
    env: &mut Env,
    code: &Snippet,
    options: &MeasureOptions,
) -> Result<Measurement, TimingError> {
    if options.loops == Some(0) {
        return Err(TimingError::ZeroLoops);
    }
    if options.repeat == 0 {
        return Err(TimingError::ZeroRepeat);
    }

    let loops = match options.loops {
        Some(loops) => loops,
        None => calibrate(clock, env, code, CALIBRATION_THRESHOLD, CALIBRATION_ATTEMPTS)?,
    };

    let mut best: Option<Duration> = None;
    for _ in 0..options.repeat {
        let elapsed = run_trial(clock, env, code, loops)?;
        best = Some(match best {
            Some(current) => current.min(elapsed),
            None => elapsed,
        });
    }
    // repeat >= 1 was checked above, so at least one trial ran
    let best = best.unwrap_or_default();

    let per_loop = best.as_secs_f64() / loops as f64;
    let (timing, unit) = scale_timing(per_loop, options.force_millis);
    Ok(Measurement {
        loops,
        repeat: options.repeat,
        timing,
        unit,
    })
}

/// Pick a display unit for a per-iteration time given in seconds.
///
/// The largest unit that keeps the scaled value at or above 0.1 wins, so
/// reported numbers stay in a readable range. Forcing milliseconds skips
/// unit selection entirely, which keeps stored history unit-stable. Times
/// of zero or below fall back to nanoseconds rather than failing; times of
/// a thousand seconds or more stay in seconds.
pub fn scale_timing(seconds_per_loop: f64, force_millis: bool) -> (f64, TimeUnit) {
    if force_millis {
        return (
            seconds_per_loop * TimeUnit::Millis.per_second(),
            TimeUnit::Millis,
        );
    }
    if seconds_per_loop >= 1000.0 {
        return (seconds_per_loop, TimeUnit::Seconds);
    }
    if seconds_per_loop <= 0.0 || seconds_per_loop.is_nan() {
        return (
            seconds_per_loop * TimeUnit::Nanos.per_second(),
            TimeUnit::Nanos,
        );
    }
    for unit in TimeUnit::DESCENDING {
        let scaled = seconds_per_loop * unit.per_second();
        if scaled >= 0.1 {
            return (scaled, unit);
        }
    }
    (
        seconds_per_loop * TimeUnit::Nanos.per_second(),
        TimeUnit::Nanos,
    )
}
