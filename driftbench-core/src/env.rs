//! Evaluation Environment
//!
//! The mutable bindings a benchmark's snippets execute against. Every run
//! gets a fresh environment cloned from the sandbox's base; the base itself
//! is never mutated.

use serde_json::Value;
use std::collections::BTreeMap;

/// Named runtime bindings for one benchmark run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
    vars: BTreeMap<String, Value>,
}

impl Env {
    /// Empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for declaring a base environment.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Look up a binding as an i64.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.vars.get(name).and_then(Value::as_i64)
    }

    /// Look up a binding as an f64. Integers coerce.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.vars.get(name).and_then(Value::as_f64)
    }

    /// Look up a binding as a bool.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.vars.get(name).and_then(Value::as_bool)
    }

    /// Look up a binding as a string slice.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Value::as_str)
    }

    /// Remove a binding, returning its value if it was bound.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the environment has no bindings.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), value))
    }
}
