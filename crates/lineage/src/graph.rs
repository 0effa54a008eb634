//! Immutable lineage graph.
//!
//! # Edge Direction Convention
//!
//! Edges point from **dependency -> dependent**: if model `m1` reads from
//! source `s1`, the edge is `s1 -> m1`. Following edges forward walks
//! downstream (descendants); following them backward walks upstream
//! (ancestors).
//!
//! # Representation
//!
//! A [`Graph`] keeps its nodes and edges as plain vectors in build order and
//! mirrors them into a petgraph `DiGraph` for traversal. Node `i` of the
//! vector is `NodeIndex(i)` in the index, and edge `j` is `EdgeIndex(j)`.

use lineage_registry::ObjectType;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Identifier of a graph node.
pub type NodeId = String;

/// One project object in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id, unique within the graph
    pub id: NodeId,

    /// Kind of the underlying object
    pub object_type: ObjectType,

    /// Object name
    pub display_name: String,
}

/// Whether an edge was declared or inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The dependent object names the dependency
    Explicit,

    /// The dependency is implied, e.g. a model reading the default source
    Inferred,
}

/// Directed edge from a dependency to its dependent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Edge id, `"{source}->{target}"`; [`Graph::new`] appends `#n` when
    /// names containing `->` make that ambiguous
    pub id: String,

    /// Dependency node id
    pub source: NodeId,

    /// Dependent node id
    pub target: NodeId,

    /// Declared or inferred
    pub kind: EdgeKind,
}

impl GraphEdge {
    /// Create an edge, deriving its id from the endpoints.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, kind: EdgeKind) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}->{target}"),
            source,
            target,
            kind,
        }
    }

    /// Whether the edge starts and ends at the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Immutable node/edge set derived from one registry snapshot.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,

    /// Petgraph mirror; node and edge weights are positions in the vectors.
    index: DiGraph<usize, usize>,

    /// Node id to index.
    node_map: HashMap<NodeId, NodeIndex>,

    /// Object name to index, for resolving selector terms.
    name_map: HashMap<String, NodeIndex>,
}

impl Graph {
    /// Assemble a graph from nodes and edges.
    ///
    /// A node whose id was already seen is skipped, as is any edge with an
    /// endpoint that is not among the nodes. An edge whose id is already
    /// taken gets the first free `#n` suffix, so edge ids stay unique.
    #[must_use]
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut graph = Self {
            nodes: Vec::with_capacity(nodes.len()),
            edges: Vec::with_capacity(edges.len()),
            index: DiGraph::with_capacity(nodes.len(), edges.len()),
            node_map: HashMap::with_capacity(nodes.len()),
            name_map: HashMap::with_capacity(nodes.len()),
        };

        for node in nodes {
            if graph.node_map.contains_key(&node.id) {
                trace!(node = %node.id, "Skipping duplicate node id");
                continue;
            }
            let ix = graph.index.add_node(graph.nodes.len());
            graph.node_map.insert(node.id.clone(), ix);
            if graph.name_map.contains_key(&node.display_name) {
                trace!(
                    name = %node.display_name,
                    node = %node.id,
                    "Name already resolves to another node"
                );
            } else {
                graph.name_map.insert(node.display_name.clone(), ix);
            }
            graph.nodes.push(node);
        }

        let mut edge_ids = HashSet::with_capacity(edges.len());
        for mut edge in edges {
            let from = graph.node_map.get(&edge.source).copied();
            let to = graph.node_map.get(&edge.target).copied();
            let (Some(from), Some(to)) = (from, to) else {
                trace!(edge = %edge.id, "Skipping edge with unknown endpoint");
                continue;
            };
            if !edge_ids.insert(edge.id.clone()) {
                edge.id = free_edge_id(&edge.id, &edge_ids);
                trace!(edge = %edge.id, "Renamed edge with colliding id");
                edge_ids.insert(edge.id.clone());
            }
            graph.index.add_edge(from, to, graph.edges.len());
            graph.edges.push(edge);
        }

        graph
    }

    /// Nodes in build order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in build order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Node ids in build order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_map.get(id).map(|&ix| self.node_at(ix))
    }

    /// Whether a node with this id exists.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Resolve an object name to its node id.
    #[must_use]
    pub fn node_id_for_name(&self, name: &str) -> Option<&str> {
        self.name_map
            .get(name)
            .map(|&ix| self.node_at(ix).id.as_str())
    }

    /// Position of a node in [`Graph::nodes`].
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.node_map.get(id).map(|&ix| self.index[ix])
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn index(&self) -> &DiGraph<usize, usize> {
        &self.index
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub(crate) fn node_at(&self, ix: NodeIndex) -> &GraphNode {
        &self.nodes[self.index[ix]]
    }
}

/// First `{id}#n` not in `taken`.
fn free_edge_id(id: &str, taken: &HashSet<String>) -> String {
    (1usize..)
        .map(|n| format!("{id}#{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| id.to_string())
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl Eq for Graph {}
