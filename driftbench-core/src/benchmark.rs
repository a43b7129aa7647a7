//! Benchmark Definitions
//!
//! A benchmark is an immutable bundle of snippets plus measurement tuning
//! and presentation metadata. Identity is derived purely from the snippet
//! source text; everything else can change without orphaning history.

use crate::fingerprint::Fingerprint;
use crate::snippet::Snippet;
use crate::timing::DEFAULT_REPEAT;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

/// One benchmark: its snippets, measurement tuning, and metadata.
pub struct Benchmark {
    code: Snippet,
    setup: Snippet,
    cleanup: Snippet,
    iterations: Option<u64>,
    repeat: u32,
    name: Option<String>,
    description: Option<String>,
    start_date: Option<DateTime<Utc>>,
    log_scale: bool,
    store_path: Option<PathBuf>,
}

impl Benchmark {
    /// Define a benchmark from its timed code and setup snippets.
    pub fn new(code: Snippet, setup: Snippet) -> Self {
        Self {
            code,
            setup,
            cleanup: Snippet::empty(),
            iterations: None,
            repeat: DEFAULT_REPEAT,
            name: None,
            description: None,
            start_date: None,
            log_scale: false,
            store_path: None,
        }
    }

    /// Attach a cleanup snippet, run after every measurement.
    pub fn with_cleanup(mut self, cleanup: Snippet) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Pin the loop count instead of calibrating it.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Number of trials to take the best of.
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Human-readable name. Not part of identity.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Free-text description. Not part of identity.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Lower bound applied when rendering this benchmark's history.
    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Hint plotting consumers to use a logarithmic value axis.
    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    /// Default location for this benchmark's historical results.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// The timed code snippet.
    pub fn code(&self) -> &Snippet {
        &self.code
    }

    /// The setup snippet, run once per environment build.
    pub fn setup(&self) -> &Snippet {
        &self.setup
    }

    /// The cleanup snippet, run after timing.
    pub fn cleanup(&self) -> &Snippet {
        &self.cleanup
    }

    /// Explicit loop count, when pinned.
    pub fn iterations(&self) -> Option<u64> {
        self.iterations
    }

    /// Trials per measurement.
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Declared name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Start date for history rendering, if any.
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Whether plots should use a log axis.
    pub fn log_scale(&self) -> bool {
        self.log_scale
    }

    /// Default history location, if any. Collaborators decide how to use it.
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    /// Display name: the declared name, or a fingerprint prefix.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("benchmark-{}", self.fingerprint().short()),
        }
    }

    /// Content hash over the setup, code, and cleanup source text.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(
            self.setup.source(),
            self.code.source(),
            self.cleanup.source(),
        )
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Benchmark({:?})", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(source: &str) -> Snippet {
        Snippet::new(source, |_| Ok(()))
    }

    #[test]
    fn fingerprint_ignores_metadata() {
        let a = Benchmark::new(noop("x()"), noop("init()"))
            .with_name("first")
            .with_repeat(5)
            .with_iterations(100)
            .with_log_scale(true);
        let b = Benchmark::new(noop("x()"), noop("init()"))
            .with_name("second")
            .with_description("different metadata entirely");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_all_three_snippets() {
        let base = Benchmark::new(noop("x()"), noop("init()"));
        let code = Benchmark::new(noop("y()"), noop("init()"));
        let setup = Benchmark::new(noop("x()"), noop("init2()"));
        let cleanup = Benchmark::new(noop("x()"), noop("init()")).with_cleanup(noop("drop()"));

        assert_ne!(base.fingerprint(), code.fingerprint());
        assert_ne!(base.fingerprint(), setup.fingerprint());
        assert_ne!(base.fingerprint(), cleanup.fingerprint());
    }

    #[test]
    fn label_falls_back_to_fingerprint_prefix() {
        let bench = Benchmark::new(noop("x()"), noop(""));
        let label = bench.label();
        assert!(label.starts_with("benchmark-"));
        assert_eq!(label.len(), "benchmark-".len() + 8);

        let named = bench.with_name("windowed sum");
        assert_eq!(named.label(), "windowed sum");
    }

    #[test]
    fn defaults() {
        let bench = Benchmark::new(noop("x()"), noop(""));
        assert_eq!(bench.repeat(), DEFAULT_REPEAT);
        assert_eq!(bench.iterations(), None);
        assert!(bench.cleanup().is_empty());
        assert!(!bench.log_scale());
        assert_eq!(bench.store_path(), None);
        assert_eq!(bench.start_date(), None);
    }
}
