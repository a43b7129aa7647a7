//! History Records
//!
//! A record couples a benchmark's fingerprint with its timing series. The
//! fingerprint is the only key; names and descriptions can change without
//! touching stored history.

use crate::series::TimingSeries;
use chrono::{DateTime, Utc};
use driftbench_core::Fingerprint;
use serde::{Deserialize, Serialize};

/// Historical results for one benchmark identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Identity the series belongs to.
    pub fingerprint: Fingerprint,
    /// Recorded measurements, oldest first.
    pub timing: TimingSeries,
}

impl HistoryRecord {
    /// Empty record for `fingerprint`.
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            timing: TimingSeries::new(),
        }
    }

    /// Copy of the record with the series trimmed to `start` and later.
    pub fn truncated_before(&self, start: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            fingerprint: self.fingerprint,
            timing: self.timing.truncate_before(start),
        }
    }
}
