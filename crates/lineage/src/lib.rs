//! Lineage graph engine for BI-as-code projects.
//!
//! Turns a [`Registry`] of named project objects into a dependency graph,
//! narrows it with a compact selector language, and lays it out left to right
//! for rendering.
//!
//! # Pipeline
//!
//! 1. [`GraphBuilder`] derives a [`Graph`] from a registry snapshot.
//! 2. [`LayoutEngine`] lays out the *full* graph, so positions stay put while
//!    the selector changes.
//! 3. [`selector::parse`] and [`Selector::select`] compute the selected node
//!    ids, expanding ancestors and descendants with bounded BFS.
//! 4. [`filter`] restricts the graph to the selection.
//!
//! [`LineageCache`] runs the pipeline with memoization keyed on the registry
//! fingerprint and the selector string.
//!
//! # Example
//!
//! ```
//! use lineage::{build, filter, selector, LayoutEngine};
//! use lineage::{ObjectRecord, ObjectType, Registry};
//!
//! let registry = Registry::from_iter([
//!     ObjectRecord::new("s1", ObjectType::Source),
//!     ObjectRecord::new("m1", ObjectType::Model).depends_on(["s1"]),
//!     ObjectRecord::new("c1", ObjectType::Chart).depends_on(["m1"]),
//! ]);
//!
//! let graph = build(&registry);
//! let layout = LayoutEngine::default().run(&graph);
//! assert_eq!(layout.rank("c1"), Some(2));
//!
//! let selected = selector::parse("+m1").select(&graph);
//! let upstream = filter(&graph, &selected);
//! assert_eq!(upstream.node_ids().collect::<Vec<_>>(), vec!["s1", "m1"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod render;
pub mod selector;
pub mod traversal;

pub use builder::{GraphBuilder, build};
pub use cache::{LaidOutGraph, LineageCache};
pub use config::{BuildOptions, EngineConfig, LayoutConfig, NodeIdScheme, NodeSize, Spacing};
pub use error::{Error, Result};
pub use filter::filter;
pub use graph::{EdgeKind, Graph, GraphEdge, GraphNode, NodeId};
pub use layout::{Layout, LayoutEngine, LayoutPosition, layout};
pub use render::{RenderEdge, RenderGraph, RenderNode};
pub use selector::{Generations, Selector, SelectorTerm};
pub use traversal::{Reached, TraversalDirection, ancestors_of, descendants_of, reachable};

pub use lineage_registry::{ObjectLayer, ObjectRecord, ObjectType, ProjectSnapshot, Registry};

/// Load a project snapshot and build its lineage graph.
///
/// The snapshot's default source feeds [`BuildOptions::default_source`];
/// the node id scheme comes from `config`.
///
/// # Errors
///
/// Returns [`Error::Registry`] if the snapshot cannot be read or is invalid.
pub fn load_graph(path: impl AsRef<std::path::Path>, config: &EngineConfig) -> Result<Graph> {
    let (registry, defaults) = ProjectSnapshot::from_path(path)?.into_parts()?;
    let options = config.build.clone().with_project_defaults(&defaults);
    Ok(GraphBuilder::new(options).build(&registry))
}
