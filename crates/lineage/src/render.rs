//! Renderer-facing output.
//!
//! A [`RenderGraph`] is what the diagramming component paints: each visible
//! node with its position, each visible edge with its kind. Positions come
//! from the layout of the full graph, so filtering never moves a node.

use crate::graph::{EdgeKind, Graph, NodeId};
use crate::layout::Layout;
use lineage_registry::{ObjectLayer, ObjectType};
use serde::Serialize;
use tracing::trace;

/// A positioned node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    /// Node id
    pub id: NodeId,
    /// Object name
    pub display_name: String,
    /// Object kind
    pub object_type: ObjectType,
    /// Layer of the object kind, for styling
    pub layer: ObjectLayer,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// An edge between two rendered nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    /// Edge id
    pub id: String,
    /// Dependency node id
    pub source: NodeId,
    /// Dependent node id
    pub target: NodeId,
    /// Declared or inferred, for styling
    pub kind: EdgeKind,
}

/// Nodes and edges ready to paint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderGraph {
    /// Visible nodes
    pub nodes: Vec<RenderNode>,
    /// Visible edges
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    /// Join a (possibly filtered) graph with a layout.
    ///
    /// Nodes the layout does not know are placed at the origin.
    #[must_use]
    pub fn new(graph: &Graph, layout: &Layout) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| {
                let (x, y) = layout.position(&node.id).map_or_else(
                    || {
                        trace!(node = %node.id, "Node missing from layout");
                        (0.0, 0.0)
                    },
                    |position| (position.x, position.y),
                );
                RenderNode {
                    id: node.id.clone(),
                    display_name: node.display_name.clone(),
                    object_type: node.object_type,
                    layer: node.object_type.policy().layer,
                    x,
                    y,
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| RenderEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
            })
            .collect();

        Self { nodes, edges }
    }

    /// Whether there is nothing to paint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a rendered node.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
