//! Benchmark Snippets
//!
//! A snippet pairs display source text with an injected callable. The text
//! is what identity hashing and report rendering see; the callable is what
//! actually runs against the evaluation environment.

use crate::env::Env;
use std::fmt;
use thiserror::Error;

/// Error produced by a snippet callable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SnippetError {
    message: String,
}

impl SnippetError {
    /// Error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for SnippetError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for SnippetError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Outcome of one snippet invocation.
pub type SnippetResult = Result<(), SnippetError>;

/// A runnable code fragment with its display source.
///
/// The callable is invoked repeatedly against the same environment during a
/// measurement, so state it writes through [`Env`] stays visible to later
/// iterations.
pub struct Snippet {
    source: String,
    body: Box<dyn Fn(&mut Env) -> SnippetResult>,
}

impl Snippet {
    /// Snippet from source text and its callable.
    pub fn new(
        source: impl Into<String>,
        body: impl Fn(&mut Env) -> SnippetResult + 'static,
    ) -> Self {
        Self {
            source: source.into(),
            body: Box::new(body),
        }
    }

    /// The empty snippet: no source text, no effect when run.
    pub fn empty() -> Self {
        Self::new("", |_| Ok(()))
    }

    /// Display source text. Also the identity input for fingerprints.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the snippet has no source text.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Invoke the callable against `env`.
    pub fn run(&self, env: &mut Env) -> SnippetResult {
        (self.body)(env)
    }
}

impl fmt::Debug for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snippet")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
