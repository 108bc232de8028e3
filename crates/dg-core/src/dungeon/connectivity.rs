//! Reachability checks over the node graph
//!
//! Traversal is an explicit-stack depth-first search so large layouts do not
//! grow the call stack.

use hashbrown::HashSet;

use super::node::{NodeGraph, NodeId};

/// Nodes reachable from `start`, `start` included
pub fn reachable_from(graph: &NodeGraph, start: NodeId) -> HashSet<NodeId> {
    let mut visited = HashSet::with_capacity(graph.len());
    walk(graph, start, &mut visited);
    visited
}

/// Mark everything reachable from `start` that is not already in `visited`
fn walk(graph: &NodeGraph, start: NodeId, visited: &mut HashSet<NodeId>) {
    if !graph.contains(start) || !visited.insert(start) {
        return;
    }

    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        let Some(node) = graph.get(current) else {
            continue;
        };
        for &next in node.neighbors() {
            if graph.contains(next) && visited.insert(next) {
                stack.push(next);
            }
        }
    }
}

/// Check that every node is reachable from the first one
///
/// An empty graph counts as connected.
pub fn is_connected(graph: &NodeGraph) -> bool {
    match graph.nodes().first() {
        Some(first) => reachable_from(graph, first.id()).len() == graph.len(),
        None => true,
    }
}

/// Number of connected components
pub fn count_components(graph: &NodeGraph) -> usize {
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(graph.len());
    let mut components = 0;
    for node in graph {
        if !seen.contains(&node.id()) {
            walk(graph, node.id(), &mut seen);
            components += 1;
        }
    }
    components
}

/// Tracks reachability of the layout across destructive edits
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityValidator;

impl ConnectivityValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check that the graph forms a single component
    pub fn validate(&self, graph: &NodeGraph) -> bool {
        is_connected(graph)
    }
}
