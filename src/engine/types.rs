//! Engine types
//!
//! Run options and statistics for the extraction engine.

use crate::hierarchy::DepthReport;
use crate::output::OutputFormat;
use crate::projection::GenerationStamp;
use std::path::PathBuf;

/// Overrides applied on top of a job definition for one run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stamp every row with this value instead of the current time
    pub stamp: Option<GenerationStamp>,
    /// Write to this file instead of the job's output path
    pub output_path: Option<PathBuf>,
    /// Write in this format instead of the job's output format
    pub output_format: Option<OutputFormat>,
}

impl RunOptions {
    /// Create empty run options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed generation stamp
    #[must_use]
    pub fn with_stamp(mut self, stamp: GenerationStamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    /// Override the output file
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Override the output format
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Statistics from a run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Pages fetched from the source
    pub pages_fetched: usize,
    /// Raw records decoded
    pub records_fetched: usize,
    /// Flat rows produced (after exploding)
    pub rows_projected: usize,
    /// Rows accepted by the sink
    pub rows_written: usize,
    /// Depth resolution outcome, when the job computes levels
    pub depths: Option<DepthReport>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cycles broken during depth resolution
    pub fn cycles(&self) -> usize {
        self.depths.as_ref().map_or(0, |report| report.cycles.len())
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
