//! Timing Series
//!
//! An ordered run of measurements for one benchmark. Points carry a
//! timestamp and a per-iteration time in milliseconds, the unit everything
//! downstream agrees on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// When the measurement was taken.
    pub at: DateTime<Utc>,
    /// Best per-iteration time in milliseconds.
    pub millis: f64,
}

/// Ordered history of measurements for one benchmark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSeries {
    points: Vec<SeriesPoint>,
}

impl TimingSeries {
    /// Empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point. Points are expected in chronological order.
    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push(point);
    }

    /// Record a measurement taken at `at`.
    pub fn record(&mut self, at: DateTime<Utc>, millis: f64) {
        self.push(SeriesPoint { at, millis });
    }

    /// The points in insertion order.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Copy of the series keeping only points at or after `start`.
    pub fn truncate_before(&self, start: DateTime<Utc>) -> TimingSeries {
        TimingSeries {
            points: self
                .points
                .iter()
                .copied()
                .filter(|point| point.at >= start)
                .collect(),
        }
    }

    /// Iterate points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }
}
