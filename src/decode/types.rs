//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use crate::pagination::PageInfo;
use crate::types::RawRecord;
use serde::{Deserialize, Serialize};

/// Format of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// XML format
    Xml,
}

/// Configuration for decoding responses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Response format
    pub format: DecoderFormat,
    /// Where records live: a dot path for JSON, an element name for XML
    pub record_path: Option<String>,
    /// Where the pagination block lives: a dot path for JSON, an element
    /// name for XML
    pub pagination_path: Option<String>,
}

impl DecoderConfig {
    /// Create a JSON decoder config
    pub fn json() -> Self {
        Self {
            format: DecoderFormat::Json,
            ..Default::default()
        }
    }

    /// Create a JSON decoder config with a record path
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            format: DecoderFormat::Json,
            record_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Create an XML decoder config
    pub fn xml(record_element: impl Into<String>) -> Self {
        Self {
            format: DecoderFormat::Xml,
            record_path: Some(record_element.into()),
            ..Default::default()
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Set where the pagination block is read from
    #[must_use]
    pub fn with_pagination_path(mut self, path: impl Into<String>) -> Self {
        self.pagination_path = Some(path.into());
        self
    }
}

/// Records decoded from one response body
#[derive(Debug, Clone, Default)]
pub struct DecodedPage {
    /// Records in document order
    pub records: Vec<RawRecord>,
    /// Pagination block, when the body carries one
    pub page_info: Option<PageInfo>,
}

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into records and optional page info
    fn decode(&self, body: &str) -> Result<DecodedPage>;

    /// Format this decoder handles
    fn format(&self) -> DecoderFormat;
}
