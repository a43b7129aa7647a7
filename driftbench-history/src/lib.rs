#![warn(missing_docs)]

//! Driftbench History - Collaborator Surface
//!
//! Everything storage and plotting collaborators see:
//!
//! - Timing series with date-based trimming
//! - History records keyed by benchmark fingerprint
//! - The store interface, with an in-memory reference implementation
//! - The plot interface and its display hints
//!
//! How records persist and how series get drawn is entirely the
//! collaborator's business; the engine only supplies fingerprints and
//! points in milliseconds.

mod plot;
mod record;
mod series;
mod store;

pub use plot::{PlotError, PlotHints, SeriesPlotter};
pub use record::HistoryRecord;
pub use series::{SeriesPoint, TimingSeries};
pub use store::{HistoryStore, MemoryStore, StoreError};
