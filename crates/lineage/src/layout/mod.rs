//! Deterministic layered layout, ranks running left to right.
//!
//! Sugiyama-style, in three phases:
//!
//! 1. **Ranks**: longest path from the sources, so every edge points to a
//!    higher rank. Edges closing a cycle (found by a deterministic DFS) are
//!    ignored for ranking only; they stay in the graph and are reported in
//!    [`Layout::ignored_edges`].
//! 2. **Order**: iterated barycenter sweeps reduce crossings within a bounded
//!    pass budget; ties fall back to graph order.
//! 3. **Coordinates**: `x = rank * (width + rank_gap)` and
//!    `y = order * (height + order_gap)`.
//!
//! Identical input always produces bit-identical output. Lay out the full
//! graph once per registry snapshot and filter afterwards, so changing the
//! selector never moves the nodes that remain visible.

mod order;
mod rank;

use crate::config::{LayoutConfig, NodeSize, Spacing};
use crate::graph::{Graph, NodeId};
use order::OrderInput;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Coordinates of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    /// Node id
    pub node_id: NodeId,
    /// Horizontal offset of the node's rank
    pub x: f64,
    /// Vertical offset within the rank
    pub y: f64,
}

/// Result of a layout run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<LayoutPosition>,
    ranks: Vec<usize>,
    orders: Vec<usize>,
    ignored_edges: Vec<String>,
    sweeps: usize,
    by_id: HashMap<NodeId, usize>,
}

impl Layout {
    /// Positions in the graph's node order.
    #[must_use]
    pub fn positions(&self) -> &[LayoutPosition] {
        &self.positions
    }

    /// Consume the layout, keeping only the positions.
    #[must_use]
    pub fn into_positions(self) -> Vec<LayoutPosition> {
        self.positions
    }

    /// Position of a node.
    #[must_use]
    pub fn position(&self, node_id: &str) -> Option<&LayoutPosition> {
        self.by_id.get(node_id).map(|&i| &self.positions[i])
    }

    /// Rank (column) of a node.
    #[must_use]
    pub fn rank(&self, node_id: &str) -> Option<usize> {
        self.by_id.get(node_id).map(|&i| self.ranks[i])
    }

    /// Index of a node within its rank.
    #[must_use]
    pub fn order(&self, node_id: &str) -> Option<usize> {
        self.by_id.get(node_id).map(|&i| self.orders[i])
    }

    /// Ids of the edges ignored for ranking because they close a cycle.
    #[must_use]
    pub fn ignored_edges(&self) -> &[String] {
        &self.ignored_edges
    }

    /// Barycenter passes actually run.
    #[must_use]
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Number of positioned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no node was positioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Computes [`Layout`]s with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out `graph`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn run(&self, graph: &Graph) -> Layout {
        let n = graph.node_count();
        let edges = graph.edges();

        // (edge position, source position, target position)
        let endpoints: Vec<(usize, usize, usize)> = edges
            .iter()
            .enumerate()
            .filter_map(|(position, edge)| {
                Some((
                    position,
                    graph.position_of(&edge.source)?,
                    graph.position_of(&edge.target)?,
                ))
            })
            .collect();

        let mut outgoing = vec![Vec::new(); n];
        for &(position, from, to) in &endpoints {
            outgoing[from].push((to, position));
        }
        let back_edges = rank::find_back_edges(&outgoing);

        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        let mut isolated = vec![true; n];
        for &(position, from, to) in &endpoints {
            if from != to {
                isolated[from] = false;
                isolated[to] = false;
            }
            if !back_edges.contains(&position) {
                successors[from].push(to);
                predecessors[to].push(from);
            }
        }

        let ranks = rank::assign_ranks(&successors, &predecessors);
        let (orders, sweeps) = order::order_ranks(
            &OrderInput {
                ranks: &ranks,
                successors: &successors,
                predecessors: &predecessors,
                isolated: &isolated,
            },
            self.config.sweep_budget(),
        );

        let column = self.config.node_size.width + self.config.spacing.rank_gap;
        let row = self.config.node_size.height + self.config.spacing.order_gap;
        let positions: Vec<LayoutPosition> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| LayoutPosition {
                node_id: node.id.clone(),
                x: ranks[i] as f64 * column,
                y: orders[i] as f64 * row,
            })
            .collect();

        let mut back_edges: Vec<usize> = back_edges.into_iter().collect();
        back_edges.sort_unstable();
        let ignored_edges: Vec<String> = back_edges
            .iter()
            .map(|&position| edges[position].id.clone())
            .collect();

        if !ignored_edges.is_empty() {
            debug!(
                edges = ?ignored_edges,
                "Ignoring cycle-closing edges for ranking"
            );
        }
        debug!(
            nodes = n,
            ranks = ranks.iter().max().map_or(0, |max| max + 1),
            sweeps,
            "Computed lineage layout"
        );

        let by_id = positions
            .iter()
            .enumerate()
            .map(|(i, position)| (position.node_id.clone(), i))
            .collect();

        Layout {
            positions,
            ranks,
            orders,
            ignored_edges,
            sweeps,
            by_id,
        }
    }
}

/// Lay out `graph` with the given node size and spacing.
#[must_use]
pub fn layout(graph: &Graph, node_size: NodeSize, spacing: Spacing) -> Vec<LayoutPosition> {
    LayoutEngine::new(LayoutConfig {
        node_size,
        spacing,
        ..LayoutConfig::default()
    })
    .run(graph)
    .into_positions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, GraphEdge, GraphNode};
    use lineage_registry::ObjectType;

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph::new(
            ids.iter()
                .map(|id| GraphNode {
                    id: (*id).to_string(),
                    object_type: ObjectType::Model,
                    display_name: (*id).to_string(),
                })
                .collect(),
            edges
                .iter()
                .map(|(from, to)| GraphEdge::new(*from, *to, EdgeKind::Explicit))
                .collect(),
        )
    }

    fn unit_engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig {
            node_size: NodeSize {
                width: 10.0,
                height: 4.0,
            },
            spacing: Spacing {
                rank_gap: 5.0,
                order_gap: 1.0,
            },
            max_sweeps: 4,
        })
    }

    #[test]
    fn chain_ranks_left_to_right() {
        let layout = unit_engine().run(&graph(&["s1", "m1", "c1"], &[("s1", "m1"), ("m1", "c1")]));

        assert_eq!(layout.rank("s1"), Some(0));
        assert_eq!(layout.rank("m1"), Some(1));
        assert_eq!(layout.rank("c1"), Some(2));
        let m1 = layout.position("m1").unwrap();
        assert_eq!((m1.x, m1.y), (15.0, 0.0));
        assert_eq!(layout.position("c1").unwrap().x, 30.0);
        assert_eq!(layout.sweeps(), 1);
    }

    #[test]
    fn rank_members_stack_vertically() {
        let layout = unit_engine().run(&graph(&["s1", "a", "b"], &[("s1", "a"), ("s1", "b")]));

        assert_eq!(layout.position("a").unwrap().y, 0.0);
        assert_eq!(layout.position("b").unwrap().y, 5.0);
        assert_eq!(layout.order("b"), Some(1));
    }

    #[test]
    fn isolated_nodes_rank_zero_after_connected() {
        let layout = unit_engine().run(&graph(&["lonely", "s1", "m1"], &[("s1", "m1")]));

        assert_eq!(layout.rank("lonely"), Some(0));
        assert_eq!(layout.order("s1"), Some(0));
        assert_eq!(layout.order("lonely"), Some(1));
    }

    #[test]
    fn cycles_are_ranked_without_their_closing_edge() {
        let cyclic = graph(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("b", "b")],
        );

        let layout = unit_engine().run(&cyclic);

        assert_eq!(layout.rank("a"), Some(0));
        assert_eq!(layout.rank("b"), Some(1));
        assert_eq!(layout.rank("c"), Some(2));
        assert_eq!(
            layout.ignored_edges().to_vec(),
            vec!["c->a".to_string(), "b->b".to_string()]
        );
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn self_loop_alone_is_isolated() {
        let looped = graph(
            &["loop", "s1", "m1"],
            &[("loop", "loop"), ("s1", "m1")],
        );

        let layout = unit_engine().run(&looped);

        assert_eq!(layout.rank("loop"), Some(0));
        assert_eq!(layout.order("loop"), Some(1));
    }

    #[test]
    fn positions_follow_node_order() {
        let graph = graph(&["c", "b", "a"], &[("a", "b"), ("b", "c")]);

        let positions = layout(&graph, NodeSize::default(), Spacing::default());

        let ids: Vec<_> = positions.iter().map(|p| p.node_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(positions[2].x, 0.0);
        assert_eq!(positions[0].x, 2.0 * (200.0 + 80.0));
    }

    #[test]
    fn empty_graph_has_empty_layout() {
        let layout = unit_engine().run(&Graph::default());

        assert!(layout.is_empty());
        assert!(layout.ignored_edges().is_empty());
        assert_eq!(layout.rank("anything"), None);
    }
}
