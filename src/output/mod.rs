//! Output module
//!
//! Writes reconciled tables to their destination.
//!
//! # Overview
//!
//! - `CsvSink` - header row plus data rows, UTF-8
//! - `ParquetSink` - Arrow RecordBatch with one Utf8 column per header
//! - `MemorySink` - keeps tables for inspection

mod sinks;
mod writer;

pub use sinks::{create_sink, CsvSink, MemorySink, OutputFormat, ParquetSink, RowSink};
pub use writer::{table_schema, table_to_batch, ParquetWriter, ParquetWriterConfig};

#[cfg(test)]
mod tests;
