//! Hierarchy types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Nodes
// ============================================================================

/// One entry of a parent-pointer hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Node identifier
    pub id: String,
    /// Parent identifier, `None` or blank for roots
    pub parent_id: Option<String>,
    /// Memoized depth, unset until resolved
    pub depth: Option<u32>,
}

impl HierarchyNode {
    /// Create an unresolved node
    pub fn new(id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(ToString::to_string),
            depth: None,
        }
    }

    /// Create a root node
    pub fn root(id: impl Into<String>) -> Self {
        Self::new(id, None)
    }

    /// Parent id with surrounding whitespace removed, `None` when blank
    pub fn parent(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

// ============================================================================
// Report
// ============================================================================

/// Outcome of a depth resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthReport {
    /// Number of nodes per depth
    pub distribution: BTreeMap<u32, usize>,
    /// Ids of nodes where a cycle was detected, in detection order
    pub cycles: Vec<String>,
}

impl DepthReport {
    /// Deepest level seen, if any node was resolved
    pub fn max_depth(&self) -> Option<u32> {
        self.distribution.keys().next_back().copied()
    }

    /// Whether any cycle was broken
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

// ============================================================================
// Row Fields
// ============================================================================

/// Which flat-row fields carry the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyFields {
    /// Field holding the node id
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Field holding the parent id
    #[serde(default = "default_parent_field")]
    pub parent_field: String,
    /// Field the computed depth is written to
    #[serde(default = "default_level_field")]
    pub level_field: String,
}

impl Default for HierarchyFields {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            parent_field: default_parent_field(),
            level_field: default_level_field(),
        }
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_parent_field() -> String {
    "parentProjectId".to_string()
}

fn default_level_field() -> String {
    "projectLevel".to_string()
}
