//! Flattening module
//!
//! Turns nested records into single-level [`FlatRow`]s keyed by dotted paths.
//!
//! # Overview
//!
//! - `flatten` - object trees: `{"a": {"b": 1, "c": [2, 3]}}` becomes
//!   `a.b`, `a.c.[0]`, `a.c.[1]`
//! - `flatten_markup` - XML elements: attributes and leaf text under the
//!   element's path, children keyed by their unqualified tag name
//! - `explode` - one row per element of a repeated child, sharing the
//!   parent's fields
//!
//! Traversal runs on an explicit work stack, so nesting depth is not limited
//! by the call stack.

mod markup;
mod tree;

pub use markup::{flatten_markup, parse_markup, XmlElement};
pub use tree::{explode, flatten, flatten_into};

use crate::types::{FlatRow, RawRecord};

/// Flatten a raw record of either shape with an empty prefix
pub fn flatten_record(record: &RawRecord) -> FlatRow {
    match record {
        RawRecord::Tree(node) => flatten(node, ""),
        RawRecord::Markup(element) => flatten_markup(element, ""),
    }
}

/// Join a path prefix and a segment with `.`
pub(crate) fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}
