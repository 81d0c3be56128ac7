//! Projection module
//!
//! Reconciles flat rows against a declared output schema.
//!
//! # Overview
//!
//! Rows coming out of the flattener use whatever key spellings the API
//! produced (`owner.id`, `datasource_hasExtracts`, `id`). The projector maps
//! them onto display headers (`Owner Id`, `Datasource Has Extracts`, `LUID`)
//! by exact lookup first and normalized lookup second, defaulting to an empty
//! cell. Every produced table ends with a generation-timestamp column whose
//! value is shared by all rows of the run.

mod projector;
mod types;

pub use projector::Projector;
pub use types::{GenerationStamp, OutputSchema, ReconciledRow, Table, DEFAULT_TIMESTAMP_COLUMN};
