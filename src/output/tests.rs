//! Tests for output module

use super::*;
use crate::projection::{GenerationStamp, OutputSchema, Projector, Table};
use crate::types::FlatRow;
use arrow::array::{Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::path::Path;
use tempfile::tempdir;

const STAMP: &str = "2026-05-01T00:00:00.000000+00:00";

fn projects_table() -> Table {
    let rows = vec![
        FlatRow::new()
            .with("id", "p1")
            .with("name", "Top, level")
            .with("parentProjectId", ""),
        FlatRow::new()
            .with("id", "p2")
            .with("name", "Child \"quoted\"")
            .with("parentProjectId", "p1"),
    ];
    Projector::with_id_alias("LUID").project_with_stamp(
        &rows,
        &OutputSchema::new(["id", "name", "parentProjectId"]),
        GenerationStamp::fixed(STAMP),
    )
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

// ============================================================================
// Format Tests
// ============================================================================

#[test]
fn test_output_format_from_path() {
    assert_eq!(OutputFormat::from_path(Path::new("out.parquet")), OutputFormat::Parquet);
    assert_eq!(OutputFormat::from_path(Path::new("OUT.PARQUET")), OutputFormat::Parquet);
    assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
    assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Csv);
}

#[test]
fn test_output_format_deserialize() {
    let format: OutputFormat = serde_yaml::from_str("parquet").unwrap();
    assert_eq!(format, OutputFormat::Parquet);
    assert_eq!(OutputFormat::default(), OutputFormat::Csv);
}

// ============================================================================
// CSV Sink Tests
// ============================================================================

#[test]
fn test_csv_sink_writes_headers_and_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.csv");

    let mut sink = CsvSink::new(&path);
    let written = sink.write(&projects_table()).unwrap();
    assert_eq!(written, 2);

    let (headers, rows) = read_csv(&path);
    assert_eq!(
        headers,
        vec!["LUID", "Name", "Parent Project Id", "Admin Insights Published At"]
    );
    assert_eq!(
        rows,
        vec![
            vec!["p1", "Top, level", "", STAMP],
            vec!["p2", "Child \"quoted\"", "p1", STAMP],
        ]
    );
}

#[test]
fn test_csv_sink_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "stale,content\n1,2\n3,4\n5,6\n").unwrap();

    let table = Projector::default().project_with_stamp(
        &[],
        &OutputSchema::new(["name"]),
        GenerationStamp::fixed(STAMP),
    );
    CsvSink::new(&path).write(&table).unwrap();

    let (headers, rows) = read_csv(&path);
    assert_eq!(headers, vec!["Name", "Admin Insights Published At"]);
    assert_eq!(rows, vec![vec!["", STAMP]]);
}

#[test]
fn test_csv_sink_custom_delimiter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.tsv");
    CsvSink::new(&path)
        .with_delimiter(b'\t')
        .write(&projects_table())
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("LUID\tName\tParent Project Id\t"));
}

#[test]
fn test_csv_sink_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    assert!(CsvSink::new(path).write(&projects_table()).is_err());
}

// ============================================================================
// Parquet Tests
// ============================================================================

#[test]
fn test_table_to_batch_all_utf8() {
    let batch = table_to_batch(&projects_table()).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 4);
    for field in batch.schema().fields() {
        assert_eq!(field.data_type(), &DataType::Utf8);
        assert!(!field.is_nullable());
    }

    let names = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(names.value(0), "Top, level");
    assert_eq!(names.null_count(), 0);
}

#[test]
fn test_parquet_writer_config() {
    let config = ParquetWriterConfig::new()
        .with_row_group_size(10)
        .with_dictionary(false)
        .uncompressed();
    assert_eq!(config.row_group_size(), 10);
    assert_eq!(ParquetWriterConfig::default().row_group_size(), 1024 * 1024);
}

#[test]
fn test_parquet_sink_round_trips_cells() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.parquet");

    let table = projects_table();
    let written = ParquetSink::new(&path).write(&table).unwrap();
    assert_eq!(written, 2);

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 2);

    let schema = batches[0].schema();
    let headers: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        headers,
        vec!["LUID", "Name", "Parent Project Id", "Admin Insights Published At"]
    );

    let parents = batches[0]
        .column(2)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(parents.value(0), "");
    assert_eq!(parents.value(1), "p1");
}

#[test]
fn test_parquet_writer_rows_written() {
    let dir = tempdir().unwrap();
    let table = projects_table();
    let batch = table_to_batch(&table).unwrap();

    let mut writer = ParquetWriter::new(
        dir.path().join("twice.parquet"),
        &table_schema(&table),
        &ParquetWriterConfig::default(),
    )
    .unwrap();
    writer.write(&batch).unwrap();
    writer.write(&batch).unwrap();
    assert_eq!(writer.rows_written(), 4);
    assert_eq!(writer.close().unwrap(), 4);
}

#[test]
fn test_create_sink_dispatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("via_factory.parquet");
    let mut sink = create_sink(OutputFormat::Parquet, &path);
    sink.write(&projects_table()).unwrap();
    assert!(path.exists());
}

// ============================================================================
// Memory Sink Tests
// ============================================================================

#[test]
fn test_memory_sink_keeps_tables() {
    let mut sink = MemorySink::new();
    assert!(sink.last().is_none());
    sink.write(&projects_table()).unwrap();
    assert_eq!(sink.tables().len(), 1);
    assert_eq!(sink.last().unwrap().len(), 2);
}
