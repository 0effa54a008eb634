//! Graph construction from a registry snapshot.
//!
//! Every record becomes one node. Every dependency name that resolves to a
//! record becomes an explicit edge `dependency -> dependent`; names that do
//! not resolve are dropped, since dangling references are normal while a
//! project is being edited. Self references are kept as self-loops.
//!
//! Kinds whose policy infers a default source (models) get an inferred edge
//! from the configured default source when they reference no source
//! themselves.

use crate::config::BuildOptions;
use crate::graph::{EdgeKind, Graph, GraphEdge, GraphNode};
use lineage_registry::{ObjectRecord, ObjectType, Registry};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Builds [`Graph`]s from registry snapshots.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    /// Create a builder with the given options.
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the graph for a registry snapshot.
    #[must_use]
    pub fn build(&self, registry: &Registry) -> Graph {
        let scheme = self.options.id_scheme;
        let default_source = self.default_source(registry);

        let nodes: Vec<GraphNode> = registry
            .iter()
            .map(|record| GraphNode {
                id: scheme.node_id(record),
                object_type: record.object_type,
                display_name: record.name.clone(),
            })
            .collect();

        let mut edges = Vec::new();
        let mut dropped = 0usize;

        for record in registry {
            let target = scheme.node_id(record);
            let mut seen = HashSet::new();
            let mut reads_source = false;

            for name in &record.dependency_names {
                if !seen.insert(name.as_str()) {
                    continue;
                }

                let Some(dependency) = registry.get(name) else {
                    dropped += 1;
                    trace!(
                        object = %record.name,
                        reference = %name,
                        "Dropping reference to unknown object"
                    );
                    continue;
                };

                reads_source |= dependency.object_type == ObjectType::Source;
                edges.push(GraphEdge::new(
                    scheme.node_id(dependency),
                    target.clone(),
                    EdgeKind::Explicit,
                ));
            }

            if let Some(source) = default_source {
                let infers = record.object_type.policy().infers_default_source;
                if infers && !reads_source && source.name != record.name {
                    edges.push(GraphEdge::new(scheme.node_id(source), target, EdgeKind::Inferred));
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            dropped_references = dropped,
            "Built lineage graph"
        );

        Graph::new(nodes, edges)
    }

    /// The configured default source, if it names a source record.
    fn default_source<'r>(&self, registry: &'r Registry) -> Option<&'r ObjectRecord> {
        let name = self.options.default_source.as_deref()?;

        match registry.get(name) {
            Some(record) if record.object_type == ObjectType::Source => Some(record),
            Some(record) => {
                debug!(
                    name,
                    object_type = %record.object_type,
                    "Default source is not a source; skipping inferred edges"
                );
                None
            }
            None => {
                debug!(
                    name,
                    "Default source not in registry; skipping inferred edges"
                );
                None
            }
        }
    }
}

/// Build a graph with default options.
#[must_use]
pub fn build(registry: &Registry) -> Graph {
    GraphBuilder::default().build(registry)
}
