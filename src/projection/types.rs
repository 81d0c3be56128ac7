//! Projection types
//!
//! Declared schema, generation stamp and the reconciled table handed to a
//! row sink.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw name of the generation-timestamp column
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "AdminInsightsPublishedAt";

// ============================================================================
// Output Schema
// ============================================================================

/// Ordered list of declared column names
///
/// An empty schema switches the projector to auto-discover mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSchema {
    columns: Vec<String>,
}

impl OutputSchema {
    /// Create a schema from column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Schema that asks for auto-discovery
    pub fn auto() -> Self {
        Self::default()
    }

    /// Declared column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the schema is empty (auto-discover mode)
    pub fn is_auto(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for OutputSchema {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ============================================================================
// Generation Stamp
// ============================================================================

/// The single moment a run's rows are stamped with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationStamp(String);

impl GenerationStamp {
    /// Stamp for the current UTC time
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Stamp for a given UTC time (RFC 3339, microseconds, `+00:00`)
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(time.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    /// Stamp with a fixed value
    pub fn fixed(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Stamp text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Reconciled Row
// ============================================================================

/// A row keyed exactly by the table's headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledRow {
    cells: IndexMap<String, String>,
}

impl ReconciledRow {
    /// Create a row with every header set to the empty string
    pub(crate) fn blank(headers: &[String]) -> Self {
        Self {
            cells: headers
                .iter()
                .map(|h| (h.clone(), String::new()))
                .collect(),
        }
    }

    /// Set a cell. Only headers present in the row are accepted.
    pub(crate) fn set(&mut self, header: &str, value: impl Into<String>) {
        if let Some(cell) = self.cells.get_mut(header) {
            *cell = value.into();
        }
    }

    /// Get a cell value
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    /// Headers in table order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Cell values in table order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.values().map(String::as_str)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ============================================================================
// Table
// ============================================================================

/// Headers plus reconciled rows, ready for a row sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<ReconciledRow>,
    stamp: GenerationStamp,
}

impl Table {
    pub(crate) fn new(headers: Vec<String>, rows: Vec<ReconciledRow>, stamp: GenerationStamp) -> Self {
        Self {
            headers,
            rows,
            stamp,
        }
    }

    /// Column headers in output order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Reconciled rows in input order
    pub fn rows(&self) -> &[ReconciledRow] {
        &self.rows
    }

    /// The generation stamp shared by every row
    pub fn stamp(&self) -> &GenerationStamp {
        &self.stamp
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as value vectors aligned with [`Table::headers`]
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> {
        self.rows.iter().map(|row| row.values().collect())
    }

    /// All values of one column
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        if !self.headers.iter().any(|h| h == header) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(header).unwrap_or_default())
                .collect(),
        )
    }
}
