//! Common types used throughout insights-extract
//!
//! This module contains the record model shared by the decoders, the
//! flattener and the projector: the decoded object tree ([`Node`]), the raw
//! record handed over by a page source ([`RawRecord`]) and the flat row
//! produced from it ([`FlatRow`]).

use crate::flatten::XmlElement;
use crate::keys::KeyNormalizer;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Object Tree
// ============================================================================

/// Leaf value of a decoded tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Missing or explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Number, kept in its JSON representation
    Number(serde_json::Number),
    /// Text
    Text(String),
}

impl Scalar {
    /// Cell text for this scalar. Null renders as the empty string.
    pub fn to_cell(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// A decoded, arbitrarily nested record
///
/// The three variants are the only shapes the flattener has to handle, so
/// every traversal matches them exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf value
    Scalar(Scalar),
    /// Keyed children, in document order
    Mapping(IndexMap<String, Node>),
    /// Repeated children
    Sequence(Vec<Node>),
}

impl Node {
    /// Create a null leaf
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Create a text leaf
    pub fn text(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Text(s.into()))
    }

    /// Look up a direct child of a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a dot-separated path through nested mappings
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        let path = path.strip_prefix("$.").unwrap_or(path);
        if path.is_empty() || path == "$" {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, part| current.get(part))
    }

    /// Whether this node is a leaf
    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Detach children onto a work list so deep trees drop without recursion
        let mut pending: Vec<Node> = match self {
            Node::Scalar(_) => return,
            Node::Mapping(map) if map.is_empty() => return,
            Node::Sequence(items) if items.is_empty() => return,
            Node::Mapping(map) => map.drain(..).map(|(_, child)| child).collect(),
            Node::Sequence(items) => std::mem::take(items),
        };
        while let Some(mut node) = pending.pop() {
            match &mut node {
                Node::Scalar(_) => {}
                Node::Mapping(map) => pending.extend(map.drain(..).map(|(_, child)| child)),
                Node::Sequence(items) => pending.append(items),
            }
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::Text(s)),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

// ============================================================================
// Raw Record
// ============================================================================

/// A record as produced by a page source, before flattening
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Decoded object tree (JSON bodies)
    Tree(Node),
    /// Markup element (XML bodies)
    Markup(XmlElement),
}

impl From<Node> for RawRecord {
    fn from(node: Node) -> Self {
        RawRecord::Tree(node)
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        RawRecord::Tree(Node::from(value))
    }
}

impl From<XmlElement> for RawRecord {
    fn from(element: XmlElement) -> Self {
        RawRecord::Markup(element)
    }
}

// ============================================================================
// Flat Row
// ============================================================================

/// Single-level mapping of path key to cell text
///
/// Insertion order follows traversal order; a repeated key keeps its first
/// position and takes the latest value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRow {
    cells: IndexMap<String, String>,
}

impl FlatRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any previous value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(key.into(), value.into());
    }

    /// Set a cell with a builder-style call
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a cell value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Iterate over (key, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Merge another row into this one; keys from `other` win
    pub fn extend(&mut self, other: FlatRow) {
        self.cells.extend(other.cells);
    }

    /// Build the `normalize(key) -> key` index used for fuzzy lookups.
    ///
    /// When several keys normalize to the same string the first inserted key
    /// is kept.
    pub fn normalized_index(&self, normalizer: &KeyNormalizer) -> HashMap<String, &str> {
        let mut index: HashMap<String, &str> = HashMap::with_capacity(self.cells.len());
        for key in self.cells.keys() {
            let normalized = normalizer.normalize(key);
            if let Some(existing) = index.get(&normalized) {
                tracing::debug!(
                    "Keys '{existing}' and '{key}' both normalize to '{normalized}', keeping '{existing}'"
                );
                continue;
            }
            index.insert(normalized, key.as_str());
        }
        index
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for FlatRow {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
