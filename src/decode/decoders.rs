//! Decoder implementations
//!
//! Each decoder handles a specific response format.

use super::types::{DecodedPage, DecoderConfig, DecoderFormat, RecordDecoder};
use crate::error::{Error, Result};
use crate::flatten::parse_markup;
use crate::pagination::PageInfo;
use crate::types::{Node, RawRecord};
use serde_json::Value;
use tracing::debug;

/// Build the decoder described by a config
pub fn create_decoder(config: &DecoderConfig) -> Box<dyn RecordDecoder> {
    match config.format {
        DecoderFormat::Json => Box::new(JsonDecoder {
            record_path: config.record_path.clone(),
            pagination_path: config.pagination_path.clone(),
        }),
        DecoderFormat::Xml => Box::new(XmlDecoder {
            record_element: config.record_path.clone(),
            pagination_element: config.pagination_path.clone(),
        }),
    }
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot path to the records
    record_path: Option<String>,
    /// Dot path to the pagination object
    pagination_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
            pagination_path: None,
        }
    }

    /// Read page info from the object at `path`
    #[must_use]
    pub fn with_pagination(mut self, path: impl Into<String>) -> Self {
        self.pagination_path = Some(path.into());
        self
    }

    /// Extract records from a JSON value using the record path
    fn extract_records(&self, value: Value) -> Vec<RawRecord> {
        let target = match &self.record_path {
            Some(path) => match extract_simple_path(&value, path) {
                Some(found) => found.clone(),
                None => {
                    debug!("Record path '{path}' not found in response");
                    return Vec::new();
                }
            },
            // No path - treat entire response as records
            None => value,
        };

        match target {
            Value::Array(items) => items
                .into_iter()
                .map(|item| RawRecord::Tree(Node::from(item)))
                .collect(),
            Value::Null => Vec::new(),
            other => vec![RawRecord::Tree(Node::from(other))],
        }
    }

    fn extract_page_info(&self, value: &Value) -> Option<PageInfo> {
        let block = extract_simple_path(value, self.pagination_path.as_deref()?)?;
        let field = |name: &str| block.get(name).and_then(json_text);
        Some(PageInfo::parse(
            field("pageNumber").as_deref(),
            field("pageSize").as_deref(),
            field("totalAvailable").as_deref(),
        ))
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<DecodedPage> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;
        let page_info = self.extract_page_info(&value);
        Ok(DecodedPage {
            records: self.extract_records(value),
            page_info,
        })
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Json
    }
}

/// Numbers and strings both appear in pagination blocks
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// XML Decoder
// ============================================================================

/// XML decoder with record element extraction
#[derive(Debug, Clone, Default)]
pub struct XmlDecoder {
    /// Local name of record elements
    record_element: Option<String>,
    /// Local name of the pagination element
    pagination_element: Option<String>,
}

impl XmlDecoder {
    /// Create a new XML decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an XML decoder with a record element name
    pub fn with_element(element: impl Into<String>) -> Self {
        Self {
            record_element: Some(element.into()),
            pagination_element: None,
        }
    }

    /// Read page info from the attributes of the named element
    #[must_use]
    pub fn with_pagination(mut self, element: impl Into<String>) -> Self {
        self.pagination_element = Some(element.into());
        self
    }
}

impl RecordDecoder for XmlDecoder {
    fn decode(&self, body: &str) -> Result<DecodedPage> {
        let root = parse_markup(body)?;

        let page_info = self
            .pagination_element
            .as_deref()
            .and_then(|name| root.find(name))
            .map(|block| {
                PageInfo::parse(
                    block.attr("pageNumber"),
                    block.attr("pageSize"),
                    block.attr("totalAvailable"),
                )
            });

        let records = match &self.record_element {
            Some(element) => root
                .descendants(element)
                .into_iter()
                .cloned()
                .map(RawRecord::Markup)
                .collect(),
            None => vec![RawRecord::Markup(root)],
        };

        Ok(DecodedPage { records, page_info })
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Xml
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract a value using simple dot-notation path
fn extract_simple_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                (arr.len() as i64 + index) as usize
            } else {
                index as usize
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}
