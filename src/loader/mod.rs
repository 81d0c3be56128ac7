//! YAML Loader module
//!
//! Parse job definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `JobDefinition` - Declarative extraction job
//! - Request, decoder, explode and output sections
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_job, load_job_from_str};
pub use types::{
    DecoderDefinition, ExplodeDefinition, HttpDefinition, JobDefinition, OutputDefinition,
    RequestDefinition,
};

#[cfg(test)]
mod tests;
