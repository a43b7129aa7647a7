//! Benchmark Discovery
//!
//! Namespaces map declared names to entries; suites are ordered groupings.
//! Flattening walks both in declaration order, descends into nested suites,
//! and keeps only benchmarks. Anything else is skipped, never an error.

use crate::benchmark::Benchmark;
use serde_json::Value;

/// One declared object in a namespace or suite.
#[derive(Debug)]
pub enum Entry {
    /// A benchmark definition.
    Benchmark(Benchmark),
    /// A nested grouping of entries.
    Suite(BenchmarkSuite),
    /// Anything else a namespace may hold; ignored by discovery.
    Value(Value),
}

impl Entry {
    /// Whether this entry is a benchmark.
    pub fn is_benchmark(&self) -> bool {
        matches!(self, Entry::Benchmark(_))
    }
}

impl From<Benchmark> for Entry {
    fn from(benchmark: Benchmark) -> Self {
        Entry::Benchmark(benchmark)
    }
}

impl From<BenchmarkSuite> for Entry {
    fn from(suite: BenchmarkSuite) -> Self {
        Entry::Suite(suite)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

/// Ordered grouping of declared entries, benchmarks or otherwise.
#[derive(Debug, Default)]
pub struct BenchmarkSuite {
    entries: Vec<Entry>,
}

impl BenchmarkSuite {
    /// Empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: impl Into<Entry>) {
        self.entries.push(entry.into());
    }

    /// Builder-style append.
    pub fn with(mut self, entry: impl Into<Entry>) -> Self {
        self.push(entry);
        self
    }

    /// Number of entries, benchmarks or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the suite has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entries in declaration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The benchmarks of this suite, nested suites included, in order.
    pub fn benchmarks(&self) -> Vec<&Benchmark> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    /// Append this suite's benchmarks to `out`, descending into nested
    /// suites. Duplicate definitions are kept.
    pub fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Benchmark>) {
        for entry in &self.entries {
            match entry {
                Entry::Benchmark(benchmark) => out.push(benchmark),
                Entry::Suite(suite) => suite.flatten_into(out),
                Entry::Value(_) => {}
            }
        }
    }
}

impl<E: Into<Entry>> FromIterator<E> for BenchmarkSuite {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered mapping from declared name to entry.
///
/// Insertion order is the traversal order. Re-inserting a used name
/// replaces the entry without moving it.
#[derive(Debug, Default)]
pub struct Namespace {
    entries: Vec<(String, Entry)>,
}

impl Namespace {
    /// Empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to an entry.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) {
        let name = name.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
    }

    /// Builder-style bind.
    pub fn with(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the namespace has no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, entry)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// All benchmarks reachable from this namespace, in traversal order.
    ///
    /// Duplicate definitions survive flattening; storage collapses
    /// identical fingerprints on its own.
    pub fn benchmarks(&self) -> Vec<&Benchmark> {
        let mut out = Vec::new();
        for (_, entry) in &self.entries {
            match entry {
                Entry::Benchmark(benchmark) => out.push(benchmark),
                Entry::Suite(suite) => suite.flatten_into(&mut out),
                Entry::Value(_) => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Snippet;
    use serde_json::json;

    fn bench(name: &str) -> Benchmark {
        Benchmark::new(Snippet::new("x()", |_| Ok(())), Snippet::empty()).with_name(name)
    }

    #[test]
    fn flatten_keeps_benchmarks_in_declaration_order() {
        let nested = BenchmarkSuite::new().with(bench("inner"));
        let suite = BenchmarkSuite::new()
            .with(bench("second"))
            .with(json!("not a benchmark"))
            .with(nested);

        let ns = Namespace::new()
            .with("a", bench("first"))
            .with("b", suite)
            .with("c", json!(42));

        let names: Vec<String> = ns.benchmarks().iter().map(|b| b.label()).collect();
        assert_eq!(names, ["first", "second", "inner"]);
    }

    #[test]
    fn non_benchmark_values_are_skipped_silently() {
        let ns = Namespace::new()
            .with("config", json!({ "threads": 4 }))
            .with("note", json!("keep me around"));
        assert!(ns.benchmarks().is_empty());
        assert_eq!(ns.len(), 2);
    }

    #[test]
    fn duplicate_definitions_survive_flattening() {
        let ns = Namespace::new()
            .with("one", bench("same"))
            .with("two", bench("same"));
        assert_eq!(ns.benchmarks().len(), 2);
    }

    #[test]
    fn reinserting_a_name_replaces_in_place() {
        let mut ns = Namespace::new();
        ns.insert("slot", bench("old"));
        ns.insert("tail", bench("tail"));
        ns.insert("slot", bench("new"));

        let names: Vec<String> = ns.benchmarks().iter().map(|b| b.label()).collect();
        assert_eq!(names, ["new", "tail"]);
        assert_eq!(ns.len(), 2);
    }

    #[test]
    fn deep_nesting_flattens_recursively() {
        let deepest = BenchmarkSuite::new().with(bench("d3"));
        let middle = BenchmarkSuite::new().with(bench("d2")).with(deepest);
        let top = BenchmarkSuite::new()
            .with(bench("d1"))
            .with(middle)
            .with(json!(null));

        let names: Vec<String> = top.benchmarks().iter().map(|b| b.label()).collect();
        assert_eq!(names, ["d1", "d2", "d3"]);
    }

    #[test]
    fn suite_collects_from_iterator() {
        let suite: BenchmarkSuite = vec![bench("a"), bench("b")].into_iter().collect();
        assert_eq!(suite.len(), 2);
        assert!(suite.entries()[0].is_benchmark());
    }
}
