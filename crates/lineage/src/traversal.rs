//! Bounded ancestor and descendant traversal.
//!
//! Breadth-first expansion from a start node. Ancestors follow edges
//! backward (upstream, toward dependencies); descendants follow edges forward
//! (downstream, toward dependents). A node is enqueued at most once, so
//! unbounded expansion terminates on cyclic graphs.

use crate::graph::{Graph, NodeId};
use crate::selector::Generations;
use petgraph::Direction;
use std::collections::{HashSet, VecDeque};

/// Which way to walk the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalDirection {
    /// Upstream: the objects a node depends on, transitively
    Ancestors,

    /// Downstream: the objects depending on a node, transitively
    Descendants,
}

impl TraversalDirection {
    fn petgraph(self) -> Direction {
        match self {
            Self::Ancestors => Direction::Incoming,
            Self::Descendants => Direction::Outgoing,
        }
    }
}

/// A node reached during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reached {
    /// Reached node id
    pub node_id: NodeId,

    /// Generations away from the start node; the start node has depth 0
    pub depth: usize,
}

/// Walk from `start` in `direction`, returning nodes in BFS order.
///
/// The start node comes first with depth 0. Each node appears once, at the
/// smallest depth it is reachable at. Unknown start ids yield nothing.
#[must_use]
pub fn reachable(
    graph: &Graph,
    start: &str,
    direction: TraversalDirection,
    generations: Generations,
) -> Vec<Reached> {
    let Some(start_ix) = graph.node_index(start) else {
        return Vec::new();
    };

    let index = graph.index();
    let mut visited = HashSet::from([start_ix]);
    let mut queue = VecDeque::from([(start_ix, 0usize)]);
    let mut result = Vec::new();

    while let Some((current, depth)) = queue.pop_front() {
        result.push(Reached {
            node_id: graph.node_at(current).id.clone(),
            depth,
        });

        if !generations.allows_expansion_from(depth) {
            continue;
        }

        for neighbor in index.neighbors_directed(current, direction.petgraph()) {
            if visited.insert(neighbor) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    result
}

/// Ancestors of `node_id` within `generations` hops, including the node.
#[must_use]
pub fn ancestors_of(graph: &Graph, node_id: &str, generations: Generations) -> HashSet<NodeId> {
    collect(graph, node_id, TraversalDirection::Ancestors, generations)
}

/// Descendants of `node_id` within `generations` hops, including the node.
#[must_use]
pub fn descendants_of(graph: &Graph, node_id: &str, generations: Generations) -> HashSet<NodeId> {
    collect(graph, node_id, TraversalDirection::Descendants, generations)
}

fn collect(
    graph: &Graph,
    node_id: &str,
    direction: TraversalDirection,
    generations: Generations,
) -> HashSet<NodeId> {
    reachable(graph, node_id, direction, generations)
        .into_iter()
        .map(|reached| reached.node_id)
        .collect()
}
