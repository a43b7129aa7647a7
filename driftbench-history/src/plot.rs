//! Plot Interface
//!
//! Rendering is fully decoupled from measurement: a plotter receives a
//! trimmed series and display hints, nothing else. Backends range from
//! terminal sparklines to image files; none of that lives here.

use crate::series::TimingSeries;
use thiserror::Error;

/// Display hints a plot backend receives alongside the series.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotHints {
    /// Chart title, usually the benchmark name.
    pub title: Option<String>,
    /// Label for the value axis.
    pub axis_label: String,
    /// Whether the value axis should be logarithmic.
    pub log_scale: bool,
}

impl Default for PlotHints {
    fn default() -> Self {
        Self {
            title: None,
            axis_label: "milliseconds".to_string(),
            log_scale: false,
        }
    }
}

/// Error from a plot backend.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The series has no points to draw.
    #[error("nothing to plot: series is empty")]
    EmptySeries,
    /// Backend-specific failure.
    #[error("plot backend error: {0}")]
    Backend(String),
}

/// Renderer of timing series.
pub trait SeriesPlotter {
    /// Draw `series` using `hints`.
    fn plot(&mut self, series: &TimingSeries, hints: &PlotHints) -> Result<(), PlotError>;
}
