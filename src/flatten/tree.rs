//! Object tree flattening

use super::join;
use crate::types::{FlatRow, Node};

/// Flatten a node into a new row, prefixing every key with `prefix`
///
/// A scalar at the top level produces a single cell keyed by the prefix
/// itself, so `flatten(&scalar, "")` yields `{"": value}`.
pub fn flatten(node: &Node, prefix: &str) -> FlatRow {
    let mut row = FlatRow::new();
    flatten_into(node, prefix, &mut row);
    row
}

/// Flatten a node into an existing row. Later writes to a key win.
pub fn flatten_into(node: &Node, prefix: &str, row: &mut FlatRow) {
    let mut stack: Vec<(String, &Node)> = vec![(prefix.to_string(), node)];

    while let Some((path, node)) = stack.pop() {
        match node {
            Node::Scalar(scalar) => row.insert(path, scalar.to_cell()),
            Node::Mapping(map) => {
                // Reverse push keeps document order on pop
                for (key, child) in map.iter().rev() {
                    stack.push((join(&path, key), child));
                }
            }
            Node::Sequence(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    stack.push((join(&path, &format!("[{index}]")), child));
                }
            }
        }
    }
}

/// Produce one row per element of the repeated child at `path`
///
/// Every row carries the record's other fields; the element's fields are
/// flattened under `alias`. A missing, null or empty child still yields a
/// single row with only the shared fields, so parents without children are
/// not dropped from the table. A single mapping at `path` is treated as a
/// one-element sequence.
pub fn explode(node: &Node, path: &str, alias: &str) -> Vec<FlatRow> {
    let nested_prefix = format!("{path}.");
    let base: FlatRow = flatten(node, "")
        .into_iter()
        .filter(|(key, _)| key != path && !key.starts_with(&nested_prefix))
        .collect();

    let children: Vec<&Node> = match node.get_path(path) {
        Some(Node::Sequence(items)) => items.iter().collect(),
        Some(child @ Node::Mapping(_)) => vec![child],
        _ => Vec::new(),
    };

    if children.is_empty() {
        return vec![base];
    }

    children
        .into_iter()
        .map(|child| {
            let mut row = base.clone();
            flatten_into(child, alias, &mut row);
            row
        })
        .collect()
}
