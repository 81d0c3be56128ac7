// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # insights-extract
//!
//! Turns the nested, irregular responses of an analytics platform's admin
//! API into flat tables with human-readable, schema-reconciled headers.
//!
//! ## Features
//!
//! - **Flattening**: JSON trees and XML elements become dotted-path rows;
//!   repeated children can be exploded into one row each
//! - **Schema reconciliation**: declared columns are matched against row
//!   keys, with case, separator and identifier-alias normalization
//! - **Hierarchy levels**: parent/child depth over the full collection, with
//!   cycles broken and reported
//! - **Paged fetching**: page-number pagination over HTTP, with a session
//!   token released on every exit path
//! - **Output**: CSV and Parquet tables, one generation stamp per run
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use insights_extract::{load_job, Extractor, Result};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let job = load_job("jobs/projects.yaml")?;
//!     let stats = Extractor::new(job).run_to_output().await?;
//!     println!("{} rows written", stats.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐
//! │ PageSource │ → │ Flatten  │ → │ Hierarchy │ → │ Projector │ → │ RowSink  │
//! │ HTTP/Static│   │ / Explode│   │  levels   │   │  headers  │   │ CSV/Parq │
//! └────────────┘   └──────────┘   └───────────┘   └───────────┘   └──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Record model: object trees, raw records and flat rows
pub mod types;

/// Key normalization and display formatting
pub mod keys;

/// Tree and markup flattening
pub mod flatten;

/// Schema reconciliation onto display headers
pub mod projection;

/// Parent/child depth resolution
pub mod hierarchy;

/// Response decoders (JSON, XML)
pub mod decode;

/// HTTP client
pub mod http;

/// Paged fetch sources
pub mod pagination;

/// Session tokens and release
pub mod session;

/// CSV/Parquet/in-memory sinks
pub mod output;

/// YAML loader for job definitions
pub mod loader;

/// Job execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{Extractor, RunOptions, RunStats};
pub use loader::{load_job, load_job_from_str, JobDefinition};
pub use projection::{GenerationStamp, OutputSchema, Projector, Table};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
