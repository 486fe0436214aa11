use eframe::egui::Rect;
use tracing::debug;

use grid_lca_explorer::flow::FlowGraph;
use grid_lca_explorer::layout::{LayoutConfig, SankeyLayout};

use super::super::{CachedLayout, FlowCache, FlowCacheKey, ViewModel};

impl ViewModel {
    fn flow_cache_key(&self) -> FlowCacheKey {
        FlowCacheKey {
            catalog_revision: self.catalog.revision(),
            min_flow_bits: self.min_flow.to_bits(),
        }
    }

    fn flow_cache(&mut self) -> &mut FlowCache {
        let key = self.flow_cache_key();
        if self.flow_cache.as_ref().is_none_or(|cache| cache.key != key) {
            self.flow_cache = None;
        }

        self.flow_cache.get_or_insert_with(|| {
            let graph = FlowGraph::build(self.catalog.records(), &self.palette, self.min_flow);
            debug!(
                nodes = graph.nodes.len(),
                links = graph.links.len(),
                dead_nodes = graph.dead_nodes().len(),
                min_flow = self.min_flow,
                "flow graph cache rebuilt"
            );
            FlowCache {
                key,
                graph,
                layout: None,
            }
        })
    }

    /// Graph for the current catalog and threshold.
    pub(in crate::app) fn flow_graph(&mut self) -> &FlowGraph {
        &self.flow_cache().graph
    }

    /// Graph plus a layout fitted to `bounds`; the layout is reused while the bounds hold.
    pub(in crate::app) fn flow_layout(&mut self, bounds: Rect) -> (&FlowGraph, &SankeyLayout) {
        let cache = self.flow_cache();

        let layout = match cache.layout.take() {
            Some(cached) if cached.bounds == bounds => cached,
            _ => CachedLayout {
                bounds,
                layout: SankeyLayout::compute(&cache.graph, bounds, LayoutConfig::default()),
            },
        };
        let cached = cache.layout.insert(layout);

        (&cache.graph, &cached.layout)
    }
}
