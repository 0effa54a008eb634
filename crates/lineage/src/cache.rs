//! Explicit-key memoization of the lineage pipeline.
//!
//! Building and laying out the graph is keyed on the registry fingerprint;
//! selecting and filtering is keyed on `(selector, fingerprint)`. A selector
//! keystroke therefore reruns only parse, traversal and filter, and an edit
//! to the registry invalidates both levels.

use crate::builder::GraphBuilder;
use crate::config::EngineConfig;
use crate::filter::filter;
use crate::graph::Graph;
use crate::layout::{Layout, LayoutEngine};
use crate::render::RenderGraph;
use crate::selector;
use lineage_registry::{Registry, RegistryFingerprint};
use tracing::{debug, trace};

/// Graph and full-graph layout for one registry snapshot.
#[derive(Debug, Clone)]
pub struct LaidOutGraph {
    fingerprint: RegistryFingerprint,
    graph: Graph,
    layout: Layout,
}

impl LaidOutGraph {
    fn compute(
        builder: &GraphBuilder,
        engine: &LayoutEngine,
        registry: &Registry,
        fingerprint: RegistryFingerprint,
    ) -> Self {
        let graph = builder.build(registry);
        let layout = engine.run(&graph);
        Self {
            fingerprint,
            graph,
            layout,
        }
    }

    /// Fingerprint of the registry this was built from.
    #[must_use]
    pub fn fingerprint(&self) -> &RegistryFingerprint {
        &self.fingerprint
    }

    /// The full graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Layout of the full graph.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Render the part of the graph `selector` selects.
    #[must_use]
    pub fn view(&self, selector: &str) -> RenderGraph {
        let selected = selector::parse(selector).select(&self.graph);
        RenderGraph::new(&filter(&self.graph, &selected), &self.layout)
    }
}

#[derive(Debug, Clone)]
struct CachedView {
    selector: String,
    fingerprint: RegistryFingerprint,
    view: RenderGraph,
}

/// Memoizes graph, layout and filtered views across calls.
#[derive(Debug, Clone, Default)]
pub struct LineageCache {
    builder: GraphBuilder,
    engine: LayoutEngine,
    lineage: Option<LaidOutGraph>,
    view: Option<CachedView>,
}

impl LineageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            builder: GraphBuilder::new(config.build),
            engine: LayoutEngine::new(config.layout),
            lineage: None,
            view: None,
        }
    }

    /// Graph and layout for `registry`, rebuilt only when its content changed.
    pub fn lineage(&mut self, registry: &Registry) -> &LaidOutGraph {
        let fingerprint = registry.fingerprint();
        let (lineage, _) = Self::refresh(
            &mut self.lineage,
            &self.builder,
            &self.engine,
            registry,
            fingerprint,
        );
        lineage
    }

    /// Rendered view of `registry` narrowed by `selector`.
    pub fn view(&mut self, registry: &Registry, selector: &str) -> &RenderGraph {
        let fingerprint = registry.fingerprint();
        let (lineage, rebuilt) = Self::refresh(
            &mut self.lineage,
            &self.builder,
            &self.engine,
            registry,
            fingerprint.clone(),
        );

        let cached = match self.view.take() {
            Some(cached)
                if !rebuilt && cached.selector == selector && cached.fingerprint == fingerprint =>
            {
                trace!(selector, "View cache hit");
                cached
            }
            _ => {
                trace!(selector, "View cache miss");
                CachedView {
                    selector: selector.to_string(),
                    fingerprint,
                    view: lineage.view(selector),
                }
            }
        };

        &self.view.insert(cached).view
    }

    /// Drop everything cached.
    pub fn clear(&mut self) {
        self.lineage = None;
        self.view = None;
    }

    fn refresh<'a>(
        slot: &'a mut Option<LaidOutGraph>,
        builder: &GraphBuilder,
        engine: &LayoutEngine,
        registry: &Registry,
        fingerprint: RegistryFingerprint,
    ) -> (&'a LaidOutGraph, bool) {
        let (lineage, rebuilt) = match slot.take() {
            Some(cached) if cached.fingerprint == fingerprint => {
                trace!(%fingerprint, "Lineage cache hit");
                (cached, false)
            }
            _ => {
                debug!(%fingerprint, records = registry.len(), "Rebuilding lineage graph");
                (
                    LaidOutGraph::compute(builder, engine, registry, fingerprint),
                    true,
                )
            }
        };

        (slot.insert(lineage), rebuilt)
    }
}
