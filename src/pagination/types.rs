//! Pagination types and traits
//!
//! Defines the paged fetch contract and the page-number bookkeeping used by
//! the HTTP source.

use crate::error::Result;
use crate::types::RawRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Page Info
// ============================================================================

/// Pagination block reported by a response
///
/// Any field may be missing or unparsable; the stop rule falls back to the
/// requested values for number and size and to 0 for the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based page number
    pub page_number: Option<u64>,
    /// Records per page
    pub page_size: Option<u64>,
    /// Total records across all pages
    pub total_available: Option<u64>,
}

impl PageInfo {
    /// Create page info with every field known
    pub fn new(page_number: u64, page_size: u64, total_available: u64) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
            total_available: Some(total_available),
        }
    }

    /// Parse page info from textual fields
    pub fn parse(
        page_number: Option<&str>,
        page_size: Option<&str>,
        total_available: Option<&str>,
    ) -> Self {
        Self {
            page_number: parse_count("pageNumber", page_number),
            page_size: parse_count("pageSize", page_size),
            total_available: parse_count("totalAvailable", total_available),
        }
    }

    /// Whether this page reaches the end of the collection
    ///
    /// An echoed page size of zero is ignored in favour of the requested one.
    pub fn is_last(&self, requested_page: u64, requested_size: u64) -> bool {
        let number = self.page_number.unwrap_or(requested_page);
        let size = self
            .page_size
            .filter(|&size| size > 0)
            .unwrap_or(requested_size);
        let total = self.total_available.unwrap_or(0);
        number.saturating_mul(size) >= total
    }
}

fn parse_count(field: &str, value: Option<&str>) -> Option<u64> {
    let value = value?.trim();
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!("Ignoring non-numeric {field} '{value}'");
            None
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// One fetched page of raw records
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Records in response order
    pub records: Vec<RawRecord>,
    /// Pagination block, when the response carried one
    pub page_info: Option<PageInfo>,
}

impl Page {
    /// Create a page without pagination info
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            page_info: None,
        }
    }

    /// Attach pagination info
    #[must_use]
    pub fn with_info(mut self, info: PageInfo) -> Self {
        self.page_info = Some(info);
        self
    }

    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A lazily fetched, finite sequence of pages
///
/// Each call performs at most one fetch. `Ok(None)` ends the sequence.
#[async_trait]
pub trait PageSource: Send {
    /// Fetch the next page
    async fn next_page(&mut self) -> Result<Option<Page>>;
}

// ============================================================================
// Configuration
// ============================================================================

/// How a source walks through pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationConfig {
    /// A single request (GraphQL queries, singleton resources)
    None,

    /// Page number pagination
    PageNumber {
        /// Query parameter name for the page number
        #[serde(default = "default_page_param")]
        page_param: String,
        /// Query parameter name for the page size
        #[serde(default = "default_page_size_param")]
        page_size_param: String,
        /// Records requested per page
        #[serde(default = "default_page_size")]
        page_size: u64,
        /// First page number
        #[serde(default = "default_start_page")]
        start_page: u64,
    },
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::page_number(default_page_size())
    }
}

impl PaginationConfig {
    /// Page number pagination with the usual parameter names
    pub fn page_number(page_size: u64) -> Self {
        Self::PageNumber {
            page_param: default_page_param(),
            page_size_param: default_page_size_param(),
            page_size,
            start_page: default_start_page(),
        }
    }

    /// Whether more than one request may be made
    pub fn is_paged(&self) -> bool {
        matches!(self, Self::PageNumber { .. })
    }
}

fn default_page_param() -> String {
    "pageNumber".to_string()
}

fn default_page_size_param() -> String {
    "pageSize".to_string()
}

fn default_page_size() -> u64 {
    1000
}

fn default_start_page() -> u64 {
    1
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Next page number to request
    pub page: u64,
    /// Pages fetched so far
    pub pages_fetched: u64,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create state with a starting page
    pub fn with_page(page: u64) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record a fetched page
    pub fn record_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.total_fetched += records as u64;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }
}
