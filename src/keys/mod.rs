//! Key handling module
//!
//! Canonicalizes field names for fuzzy matching and turns structural field
//! names into human-readable column headers.
//!
//! # Overview
//!
//! - `KeyNormalizer` - case/punctuation-insensitive comparison keys, with one
//!   configurable alias mapped back to `id`
//! - `DisplayFormatter` - title-cased headers with an acronym override table
//!
//! Both are immutable once built, so jobs with different alias policies can
//! share a process without interfering.

mod formatter;
mod normalizer;

pub use formatter::DisplayFormatter;
pub use normalizer::{KeyNormalizer, CANONICAL_ID};

#[cfg(test)]
mod tests;
