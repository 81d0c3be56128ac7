//! Schema reconciliation

use super::types::{GenerationStamp, OutputSchema, ReconciledRow, Table, DEFAULT_TIMESTAMP_COLUMN};
use crate::keys::{DisplayFormatter, KeyNormalizer};
use crate::types::FlatRow;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Projects flat rows onto display headers
#[derive(Debug, Clone)]
pub struct Projector {
    formatter: DisplayFormatter,
    normalizer: KeyNormalizer,
    timestamp_column: String,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DisplayFormatter::default(), KeyNormalizer::plain())
    }
}

impl Projector {
    /// Create a projector with the given key policies
    pub fn new(formatter: DisplayFormatter, normalizer: KeyNormalizer) -> Self {
        Self {
            formatter,
            normalizer,
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
        }
    }

    /// Projector whose identifier columns are labelled with `alias`
    /// (`LUID`, `ID`, ...) and matched back to `id`
    pub fn with_id_alias(alias: &str) -> Self {
        Self::new(
            DisplayFormatter::with_id_alias(alias),
            KeyNormalizer::new(alias),
        )
    }

    /// Use a different raw name for the generation-timestamp column
    #[must_use]
    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    /// The display formatter in use
    pub fn formatter(&self) -> &DisplayFormatter {
        &self.formatter
    }

    /// The key normalizer in use
    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }

    /// Display form of the generation-timestamp column
    pub fn timestamp_header(&self) -> String {
        self.formatter.display(&self.timestamp_column)
    }

    /// Project rows, stamping them with the current time
    pub fn project(&self, rows: &[FlatRow], schema: &OutputSchema) -> Table {
        self.project_with_stamp(rows, schema, GenerationStamp::now())
    }

    /// Project rows with an explicit generation stamp
    pub fn project_with_stamp(
        &self,
        rows: &[FlatRow],
        schema: &OutputSchema,
        stamp: GenerationStamp,
    ) -> Table {
        let table = if schema.is_auto() {
            self.project_discovered(rows, stamp)
        } else {
            self.project_declared(rows, schema, stamp)
        };

        info!(
            "Projected {} input rows onto {} columns ({} output rows)",
            rows.len(),
            table.headers().len(),
            table.len()
        );
        table
    }

    /// Declared mode: headers come from the schema, cells are looked up by
    /// exact key and then by normalized key
    fn project_declared(
        &self,
        rows: &[FlatRow],
        schema: &OutputSchema,
        stamp: GenerationStamp,
    ) -> Table {
        let timestamp_header = self.timestamp_header();
        let mut headers = Vec::with_capacity(schema.columns().len() + 1);
        let displayed = self.formatter.display_all(schema.columns());
        for (column, header) in schema.columns().iter().zip(displayed) {
            push_unique(&mut headers, header, column);
        }
        if !headers.contains(&timestamp_header) {
            headers.push(timestamp_header.clone());
        }

        // Normalized header keys do not depend on the row
        let normalized_headers: Vec<String> = headers
            .iter()
            .map(|h| self.normalizer.normalize(h))
            .collect();

        let mut output = Vec::with_capacity(rows.len().max(1));
        for row in rows {
            let index = row.normalized_index(&self.normalizer);
            let mut reconciled = ReconciledRow::blank(&headers);

            for (header, normalized) in headers.iter().zip(&normalized_headers) {
                if *header == timestamp_header {
                    reconciled.set(header, stamp.as_str());
                    continue;
                }
                let value = row.get(header).or_else(|| {
                    index
                        .get(normalized.as_str())
                        .and_then(|source_key| row.get(source_key))
                });
                if let Some(value) = value {
                    reconciled.set(header, value);
                }
            }
            output.push(reconciled);
        }

        if output.is_empty() {
            output.push(self.placeholder_row(&headers, &timestamp_header, &stamp));
        }

        Table::new(headers, output, stamp)
    }

    /// Auto-discover mode: headers are the sorted union of row keys
    fn project_discovered(&self, rows: &[FlatRow], stamp: GenerationStamp) -> Table {
        let timestamp_header = self.timestamp_header();
        let keys: BTreeSet<&str> = rows.iter().flat_map(FlatRow::keys).collect();

        let mut header_for: HashMap<&str, String> = HashMap::with_capacity(keys.len());
        let mut headers = Vec::with_capacity(keys.len() + 1);
        for &key in &keys {
            let header = self.formatter.display(key);
            push_unique(&mut headers, header.clone(), key);
            header_for.insert(key, header);
        }
        if !headers.contains(&timestamp_header) {
            headers.push(timestamp_header.clone());
        }
        debug!("Discovered {} columns from {} rows", headers.len(), rows.len());

        let mut output = Vec::with_capacity(rows.len().max(1));
        for row in rows {
            let mut reconciled = ReconciledRow::blank(&headers);
            for (key, value) in row.iter() {
                if let Some(header) = header_for.get(key) {
                    reconciled.set(header, value);
                }
            }
            reconciled.set(&timestamp_header, stamp.as_str());
            output.push(reconciled);
        }

        if output.is_empty() {
            output.push(self.placeholder_row(&headers, &timestamp_header, &stamp));
        }

        Table::new(headers, output, stamp)
    }

    /// The single row emitted for an empty extraction
    fn placeholder_row(
        &self,
        headers: &[String],
        timestamp_header: &str,
        stamp: &GenerationStamp,
    ) -> ReconciledRow {
        let mut row = ReconciledRow::blank(headers);
        row.set(timestamp_header, stamp.as_str());
        row
    }
}

/// Append a header unless an earlier column already produced it
fn push_unique(headers: &mut Vec<String>, header: String, source: &str) {
    if headers.contains(&header) {
        warn!("Column '{source}' formats to duplicate header '{header}', skipping");
        return;
    }
    headers.push(header);
}

