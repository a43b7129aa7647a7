//! Storage Interface
//!
//! The engine hands a store fingerprints and points; the store decides how
//! (or whether) anything persists. [`MemoryStore`] is the reference
//! implementation and the test double everything else is checked against.

use crate::record::HistoryRecord;
use crate::series::SeriesPoint;
use driftbench_core::Fingerprint;
use std::collections::HashMap;
use thiserror::Error;

/// Error from a history store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying IO failed.
    #[error("history store io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data could not be decoded.
    #[error("history store corrupt: {0}")]
    Corrupt(String),
    /// Backend-specific failure.
    #[error("history store error: {0}")]
    Backend(String),
}

/// Keeper of historical results keyed by benchmark fingerprint.
pub trait HistoryStore {
    /// Append one measurement to the series for `fingerprint`.
    fn record(&mut self, fingerprint: &Fingerprint, point: SeriesPoint) -> Result<(), StoreError>;

    /// Fetch the record for `fingerprint`, if any results exist.
    fn results_for(&self, fingerprint: &Fingerprint) -> Result<Option<HistoryRecord>, StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<Fingerprint, HistoryRecord>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct fingerprints with results.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no results.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for MemoryStore {
    fn record(&mut self, fingerprint: &Fingerprint, point: SeriesPoint) -> Result<(), StoreError> {
        self.records
            .entry(*fingerprint)
            .or_insert_with(|| HistoryRecord::new(*fingerprint))
            .timing
            .push(point);
        Ok(())
    }

    fn results_for(&self, fingerprint: &Fingerprint) -> Result<Option<HistoryRecord>, StoreError> {
        Ok(self.records.get(fingerprint).cloned())
    }
}
