//! Pagination module
//!
//! The paged fetch contract feeding the flattener.
//!
//! # Sources
//!
//! - **Static**: pages held in memory (file input, tests)
//! - **HTTP**: page-number pagination with `pageSize`/`pageNumber` query
//!   parameters, stopping when `pageNumber * pageSize >= totalAvailable`,
//!   when the pagination block is missing or when a page comes back empty.
//!   Unpaginated mode issues a single request.

mod sources;
mod types;

pub use sources::{collect_records, Collected, HttpPageSource, PageRequest, StaticPageSource};
pub use types::{Page, PageInfo, PageSource, PaginationConfig, PaginationState};
