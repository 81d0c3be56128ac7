//! Hierarchy module
//!
//! Computes the depth of every node in a parent-pointer forest (project
//! trees, nested folders) and writes it back into flat rows.
//!
//! Depth is 0 for roots, for nodes whose parent is blank and for nodes whose
//! parent is not part of the collection. Cycles are reported and broken by
//! forcing the re-entered node to depth 0.

mod resolver;
mod types;

pub use resolver::{annotate_levels, resolve_depths};
pub use types::{DepthReport, HierarchyFields, HierarchyNode};
