//! Call-Frame Profiler
//!
//! Accumulates wall time per named frame and reports frames sorted by
//! cumulative time. The sandbox uses it to profile a benchmark batch; it
//! works standalone around any closure too.

use crate::clock::Clock;
use std::collections::HashMap;
use std::time::Duration;

/// Accumulated statistics for one named frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame name.
    pub name: String,
    /// Number of calls attributed to the frame.
    pub calls: u64,
    /// Total wall time across all calls.
    pub cumulative: Duration,
}

impl FrameStats {
    /// Mean wall time per attributed call.
    pub fn per_call(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(self.cumulative.as_secs_f64() / self.calls as f64)
        }
    }
}

/// Wall-clock profiler keyed by frame name.
pub struct CallProfiler<'c, C: Clock> {
    clock: &'c C,
    frames: Vec<FrameStats>,
    index: HashMap<String, usize>,
}

impl<'c, C: Clock> CallProfiler<'c, C> {
    /// Profiler over the given clock.
    pub fn new(clock: &'c C) -> Self {
        Self {
            clock,
            frames: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Time `f` and attribute it to `name` as one call.
    pub fn record<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        self.record_batch(name, 1, f)
    }

    /// Time `f` once and attribute it to `name` as `calls` calls.
    ///
    /// This is how a batch loop is profiled without paying per-iteration
    /// clock overhead: the whole loop runs inside a single timed region.
    pub fn record_batch<T>(&mut self, name: &str, calls: u64, f: impl FnOnce() -> T) -> T {
        let start = self.clock.now();
        let out = f();
        let elapsed = self.clock.now().saturating_sub(start);
        self.attribute(name, calls, elapsed);
        out
    }

    /// Number of distinct frames recorded so far.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Sort frames by cumulative time, largest first, and return the report.
    /// Ties break by name.
    pub fn finish(mut self) -> ProfileReport {
        self.frames
            .sort_by(|a, b| b.cumulative.cmp(&a.cumulative).then_with(|| a.name.cmp(&b.name)));
        ProfileReport {
            frames: self.frames,
        }
    }

    fn attribute(&mut self, name: &str, calls: u64, elapsed: Duration) {
        match self.index.get(name) {
            Some(&at) => {
                let frame = &mut self.frames[at];
                frame.calls += calls;
                frame.cumulative += elapsed;
            }
            None => {
                self.index.insert(name.to_string(), self.frames.len());
                self.frames.push(FrameStats {
                    name: name.to_string(),
                    calls,
                    cumulative: elapsed,
                });
            }
        }
    }
}

/// Frame statistics sorted by cumulative time descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReport {
    frames: Vec<FrameStats>,
}

impl ProfileReport {
    /// The sorted frames.
    pub fn frames(&self) -> &[FrameStats] {
        &self.frames
    }

    /// Whether anything was recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total cumulative time across all frames.
    pub fn total(&self) -> Duration {
        self.frames.iter().map(|frame| frame.cumulative).sum()
    }
}
