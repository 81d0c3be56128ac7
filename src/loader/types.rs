//! Loader types
//!
//! Declarative job definition types for YAML parsing.

use crate::decode::{DecoderConfig, DecoderFormat};
use crate::error::{Error, Result};
use crate::hierarchy::HierarchyFields;
use crate::output::OutputFormat;
use crate::pagination::{PageRequest, PaginationConfig};
use crate::projection::{OutputSchema, DEFAULT_TIMESTAMP_COLUMN};
use crate::session::SessionConfig;
use indexmap::IndexMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Job Definition
// ============================================================================

/// One extraction job: where to fetch, how to decode and how to shape rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobDefinition {
    /// Job name, used in logs and as the default output file stem
    pub name: String,
    /// Base URL for all requests
    pub base_url: String,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpDefinition,
    /// Session token settings; no session when absent
    #[serde(default)]
    pub session: Option<SessionConfig>,
    /// The request repeated for every page
    pub request: RequestDefinition,
    /// Response decoding
    #[serde(default)]
    pub decoder: DecoderDefinition,
    /// Pagination; page-number with `pageSize`/`pageNumber` by default
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Emit one row per element of a nested sequence
    #[serde(default)]
    pub explode: Option<ExplodeDefinition>,
    /// Compute hierarchy levels over the collected rows
    #[serde(default)]
    pub hierarchy: Option<HierarchyFields>,
    /// Output shaping and destination
    #[serde(default)]
    pub output: OutputDefinition,
}

impl JobDefinition {
    /// Output file, defaulting to `<name>.<format>`
    pub fn output_path(&self) -> PathBuf {
        self.output.path.clone().unwrap_or_else(|| {
            let extension = match self.output_format() {
                OutputFormat::Csv => "csv",
                OutputFormat::Parquet => "parquet",
            };
            PathBuf::from(format!("{}.{extension}", self.name))
        })
    }

    /// Output format, from the definition or the output path
    pub fn output_format(&self) -> OutputFormat {
        match (&self.output.format, &self.output.path) {
            (Some(format), _) => *format,
            (None, Some(path)) => OutputFormat::from_path(path),
            (None, None) => OutputFormat::default(),
        }
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            headers: IndexMap::new(),
        }
    }
}

impl HttpDefinition {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout() -> u64 {
    30
}

// ============================================================================
// Request Definition
// ============================================================================

/// Request definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDefinition {
    /// HTTP method; POST when a GraphQL query is given
    #[serde(default)]
    pub method: Option<String>,
    /// URL path relative to the base URL
    pub path: String,
    /// Fixed query parameters
    #[serde(default)]
    pub params: IndexMap<String, String>,
    /// JSON request body
    #[serde(default)]
    pub body: Option<Value>,
    /// GraphQL query text, sent as `{"query": ...}`
    #[serde(default)]
    pub graphql: Option<String>,
}

impl RequestDefinition {
    /// Effective HTTP method
    pub fn method(&self) -> Result<Method> {
        match &self.method {
            Some(method) => match method.to_uppercase().as_str() {
                "GET" => Ok(Method::GET),
                "POST" => Ok(Method::POST),
                other => Err(Error::config(format!("unsupported HTTP method: {other}"))),
            },
            None if self.graphql.is_some() => Ok(Method::POST),
            None => Ok(Method::GET),
        }
    }

    /// Effective request body
    pub fn body(&self) -> Option<Value> {
        match &self.graphql {
            Some(query) => Some(serde_json::json!({ "query": query })),
            None => self.body.clone(),
        }
    }

    /// Build the page request this definition describes
    pub fn to_page_request(&self) -> Result<PageRequest> {
        Ok(PageRequest {
            method: self.method()?,
            path: self.path.clone(),
            query: self
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            body: self.body(),
        })
    }
}

// ============================================================================
// Decoder Definition
// ============================================================================

/// Decoder definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderDefinition {
    /// Body format
    #[serde(default)]
    pub format: DecoderFormat,
    /// Record location: dot path (JSON) or element name (XML)
    #[serde(default)]
    pub records: Option<String>,
    /// Pagination block location: dot path (JSON) or element name (XML)
    #[serde(default)]
    pub pagination: Option<String>,
}

impl DecoderDefinition {
    /// Decoder configuration for this definition
    pub fn to_config(&self) -> DecoderConfig {
        DecoderConfig {
            format: self.format,
            record_path: self.records.clone(),
            pagination_path: self.pagination.clone(),
        }
    }
}

// ============================================================================
// Explode Definition
// ============================================================================

/// Emit one row per element of a nested sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodeDefinition {
    /// Dot path of the sequence inside each record
    pub path: String,
    /// Prefix the element's fields are flattened under
    pub alias: String,
}

// ============================================================================
// Output Definition
// ============================================================================

/// Output shaping and destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDefinition {
    /// Declared columns; empty for auto-discovery
    #[serde(default)]
    pub columns: OutputSchema,
    /// Display label for identifier columns (`LUID`, `ID`)
    #[serde(default)]
    pub id_alias: Option<String>,
    /// Raw name of the generation-timestamp column
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    /// Columns added to every row before projection
    #[serde(default)]
    pub constants: IndexMap<String, String>,
    /// File format; guessed from `path` when absent
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Output file
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputDefinition {
    fn default() -> Self {
        Self {
            columns: OutputSchema::auto(),
            id_alias: None,
            timestamp_column: default_timestamp_column(),
            constants: IndexMap::new(),
            format: None,
            path: None,
        }
    }
}

fn default_timestamp_column() -> String {
    DEFAULT_TIMESTAMP_COLUMN.to_string()
}
