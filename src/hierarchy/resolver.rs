//! Depth resolution over parent pointers

use super::types::{DepthReport, HierarchyFields, HierarchyNode};
use crate::types::FlatRow;
use std::collections::HashMap;
use tracing::{info, warn};

/// Resolve the depth of every node in place
///
/// Nodes that already carry a depth are treated as memoized. Each walk
/// follows parent pointers with an explicit path, so self-cycles and very
/// long chains terminate without recursion.
pub fn resolve_depths(nodes: &mut [HierarchyNode]) -> DepthReport {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }

    // Parent position of every node, resolved once
    let parents: Vec<Option<usize>> = nodes
        .iter()
        .map(|node| node.parent().and_then(|p| index.get(p).copied()))
        .collect();

    let mut depths: Vec<Option<u32>> = nodes.iter().map(|n| n.depth).collect();
    let mut on_path = vec![false; nodes.len()];
    let mut path: Vec<usize> = Vec::new();
    let mut report = DepthReport::default();

    for start in 0..nodes.len() {
        if depths[start].is_some() {
            continue;
        }

        let mut current = start;
        loop {
            path.push(current);
            on_path[current] = true;

            match parents[current] {
                None => {
                    depths[current] = Some(0);
                    break;
                }
                Some(parent) if depths[parent].is_some() => break,
                Some(parent) if on_path[parent] => {
                    warn!(
                        "Circular reference in hierarchy at '{}', treating it as a root",
                        nodes[parent].id
                    );
                    depths[parent] = Some(0);
                    report.cycles.push(nodes[parent].id.clone());
                    break;
                }
                Some(parent) => current = parent,
            }
        }

        // Unwind: every node still unset sits directly below a resolved one
        while let Some(node) = path.pop() {
            on_path[node] = false;
            if depths[node].is_none() {
                let parent_depth = parents[node]
                    .and_then(|p| depths[p])
                    .unwrap_or_default();
                depths[node] = Some(parent_depth + 1);
            }
        }
    }

    for (node, depth) in nodes.iter_mut().zip(depths) {
        let depth = depth.unwrap_or_default();
        node.depth = Some(depth);
        *report.distribution.entry(depth).or_default() += 1;
    }

    info!(
        "Resolved hierarchy depths for {} nodes: {:?}",
        nodes.len(),
        report.distribution
    );
    report
}

/// Compute hierarchy levels for flat rows and write them into
/// `fields.level_field`
pub fn annotate_levels(rows: &mut [FlatRow], fields: &HierarchyFields) -> DepthReport {
    let mut nodes: Vec<HierarchyNode> = rows
        .iter()
        .map(|row| {
            HierarchyNode::new(
                row.get(&fields.id_field).unwrap_or_default(),
                row.get(&fields.parent_field),
            )
        })
        .collect();

    let report = resolve_depths(&mut nodes);

    for (row, node) in rows.iter_mut().zip(&nodes) {
        let depth = node.depth.unwrap_or_default();
        row.insert(fields.level_field.clone(), depth.to_string());
    }

    report
}
