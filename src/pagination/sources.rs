//! Page source implementations
//!
//! Each source yields pages of raw records until it is exhausted.

use super::types::{Page, PageSource, PaginationConfig, PaginationState};
use crate::decode::RecordDecoder;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::RawRecord;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::{debug, info};

// ============================================================================
// Static Source
// ============================================================================

/// Pages held in memory
///
/// Used for file input and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: VecDeque<Page>,
}

impl StaticPageSource {
    /// Create a source over the given pages
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }

    /// Create a source with one page holding every record
    pub fn single(records: Vec<RawRecord>) -> Self {
        Self::new([Page::new(records)])
    }

    /// Pages not yet handed out
    pub fn remaining(&self) -> usize {
        self.pages.len()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn next_page(&mut self) -> Result<Option<Page>> {
        Ok(self.pages.pop_front())
    }
}

// ============================================================================
// HTTP Source
// ============================================================================

/// The request a paged HTTP source repeats
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL
    pub path: String,
    /// Fixed query parameters (filters, fields)
    pub query: Vec<(String, String)>,
    /// JSON body, e.g. a GraphQL query
    pub body: Option<Value>,
}

impl PageRequest {
    /// A GET request for `path`
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A POST request for `path` with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Add a fixed query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Fetches pages over HTTP and decodes each body
pub struct HttpPageSource {
    client: HttpClient,
    request: PageRequest,
    decoder: Box<dyn RecordDecoder>,
    pagination: PaginationConfig,
    state: PaginationState,
}

impl HttpPageSource {
    /// Create a new HTTP page source
    pub fn new(
        client: HttpClient,
        request: PageRequest,
        decoder: Box<dyn RecordDecoder>,
        pagination: PaginationConfig,
    ) -> Self {
        let start = match &pagination {
            PaginationConfig::PageNumber { start_page, .. } => *start_page,
            PaginationConfig::None => 1,
        };
        Self {
            client,
            request,
            decoder,
            pagination,
            state: PaginationState::with_page(start),
        }
    }

    /// Pagination progress so far
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    fn request_config(&self) -> RequestConfig {
        let mut config = RequestConfig::new();
        for (key, value) in &self.request.query {
            config = config.query(key, value);
        }
        if let PaginationConfig::PageNumber {
            page_param,
            page_size_param,
            page_size,
            ..
        } = &self.pagination
        {
            config = config
                .query(page_size_param, page_size.to_string())
                .query(page_param, self.state.page.to_string());
        }
        if let Some(body) = &self.request.body {
            config = config.json(body.clone());
        }
        config
    }
}

impl std::fmt::Debug for HttpPageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageSource")
            .field("request", &self.request)
            .field("format", &self.decoder.format())
            .field("pagination", &self.pagination)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.state.done {
            return Ok(None);
        }

        let body = self
            .client
            .request_text(
                self.request.method.clone(),
                &self.request.path,
                self.request_config(),
            )
            .await?;
        let decoded = self.decoder.decode(&body)?;
        self.state.record_page(decoded.records.len());

        debug!(
            "Fetched page {} of {} ({} records)",
            self.state.page,
            self.request.path,
            decoded.records.len()
        );

        match &self.pagination {
            PaginationConfig::None => self.state.mark_done(),
            PaginationConfig::PageNumber { page_size, .. } => match &decoded.page_info {
                None => self.state.mark_done(),
                Some(_) if decoded.records.is_empty() => self.state.mark_done(),
                Some(info) if info.is_last(self.state.page, *page_size) => {
                    self.state.mark_done();
                }
                Some(_) => self.state.next_page(),
            },
        }

        Ok(Some(Page {
            records: decoded.records,
            page_info: decoded.page_info,
        }))
    }
}

// ============================================================================
// Draining
// ============================================================================

/// Records drained from a source, with the number of pages they came in
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Records in page order
    pub records: Vec<RawRecord>,
    /// Pages yielded, empty ones included
    pub pages: usize,
}

/// Drain a source into a single record vector
pub async fn collect_records<S>(source: &mut S) -> Result<Collected>
where
    S: PageSource + ?Sized,
{
    let mut collected = Collected::default();

    while let Some(page) = source.next_page().await? {
        collected.pages += 1;
        debug!("Collected page {} with {} records", collected.pages, page.len());
        collected.records.extend(page.records);
    }

    info!(
        "Fetched {} records in {} pages",
        collected.records.len(),
        collected.pages
    );
    Ok(collected)
}
