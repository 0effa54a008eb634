//! Restricting a graph to a selected node set.

use crate::graph::{Graph, NodeId};
use std::collections::HashSet;
use tracing::trace;

/// Keep the selected nodes and the edges between them.
///
/// Node and edge order follow `graph`. An edge survives only when both of
/// its endpoints are selected. Ids in `selected` that are not in `graph` are
/// ignored.
#[must_use]
pub fn filter(graph: &Graph, selected: &HashSet<NodeId>) -> Graph {
    let nodes = graph
        .nodes()
        .iter()
        .filter(|node| selected.contains(&node.id))
        .cloned()
        .collect::<Vec<_>>();

    let edges = graph
        .edges()
        .iter()
        .filter(|edge| selected.contains(&edge.source) && selected.contains(&edge.target))
        .cloned()
        .collect::<Vec<_>>();

    trace!(
        nodes = nodes.len(),
        edges = edges.len(),
        of_nodes = graph.node_count(),
        "Filtered lineage graph"
    );

    Graph::new(nodes, edges)
}
