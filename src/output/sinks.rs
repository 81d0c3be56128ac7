//! Row sinks
//!
//! Destinations for reconciled tables.

use super::writer::{table_schema, table_to_batch, ParquetWriter, ParquetWriterConfig};
use crate::error::{Result, ResultExt};
use crate::projection::Table;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// A destination for reconciled tables
pub trait RowSink {
    /// Write a table, returning the number of data rows written
    fn write(&mut self, table: &Table) -> Result<usize>;
}

/// File format for table output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// Parquet with one Utf8 column per header
    Parquet,
}

impl OutputFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Self::Parquet,
            _ => Self::Csv,
        }
    }
}

/// Create a file sink for the given format
pub fn create_sink(format: OutputFormat, path: impl Into<PathBuf>) -> Box<dyn RowSink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(path)),
        OutputFormat::Parquet => Box::new(ParquetSink::new(path)),
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Writes a table as CSV, replacing any existing file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    /// Create a comma-separated sink
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use a different field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSink for CsvSink {
    fn write(&mut self, table: &Table) -> Result<usize> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;

        writer.write_record(table.headers())?;
        for record in table.records() {
            writer.write_record(record)?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", table.len(), self.path.display());
        Ok(table.len())
    }
}

// ============================================================================
// Parquet
// ============================================================================

/// Writes a table as a Parquet file, replacing any existing file
#[derive(Debug, Clone)]
pub struct ParquetSink {
    path: PathBuf,
    config: ParquetWriterConfig,
}

impl ParquetSink {
    /// Create a sink with default writer settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: ParquetWriterConfig::default(),
        }
    }

    /// Use custom writer settings
    #[must_use]
    pub fn with_config(mut self, config: ParquetWriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSink for ParquetSink {
    fn write(&mut self, table: &Table) -> Result<usize> {
        let batch = table_to_batch(table)?;
        let mut writer = ParquetWriter::new(&self.path, &table_schema(table), &self.config)?;
        writer.write(&batch)?;
        let rows = writer.close()?;

        info!("Wrote {rows} rows to {}", self.path.display());
        Ok(rows)
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Keeps written tables in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: Vec<Table>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables written so far
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// The most recently written table
    pub fn last(&self) -> Option<&Table> {
        self.tables.last()
    }
}

impl RowSink for MemorySink {
    fn write(&mut self, table: &Table) -> Result<usize> {
        self.tables.push(table.clone());
        Ok(table.len())
    }
}
