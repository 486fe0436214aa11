use eframe::egui::{Pos2, Rect, pos2};

use crate::flow::{FlowGraph, NodeCategory};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_padding: f32,
    pub min_node_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 12.0,
            node_padding: 24.0,
            min_node_height: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBox {
    pub rect: Rect,
    pub column: usize,
}

/// A ribbon from the right edge of its source node to the left edge of its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkBand {
    pub source_top: Pos2,
    pub target_top: Pos2,
    pub width: f32,
}

impl LinkBand {
    /// Point on the upper edge of the ribbon; `t` runs from source to target.
    pub fn top_at(&self, t: f32) -> Pos2 {
        let t = t.clamp(0.0, 1.0);
        let mid_x = (self.source_top.x + self.target_top.x) * 0.5;
        let inverse = 1.0 - t;

        let a = inverse * inverse * inverse;
        let b = 3.0 * inverse * inverse * t;
        let c = 3.0 * inverse * t * t;
        let d = t * t * t;

        pos2(
            a * self.source_top.x + b * mid_x + c * mid_x + d * self.target_top.x,
            a * self.source_top.y + b * self.source_top.y + c * self.target_top.y
                + d * self.target_top.y,
        )
    }

    pub fn sample_top(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|step| self.top_at(step as f32 / segments as f32))
            .collect()
    }

    pub fn contains(&self, point: Pos2) -> bool {
        let (left, right) = (self.source_top.x, self.target_top.x);
        if right <= left || point.x < left || point.x > right {
            return false;
        }

        // x(t) is monotonic because both control points share the middle x.
        let mut low = 0.0f32;
        let mut high = 1.0f32;
        for _ in 0..24 {
            let mid = (low + high) * 0.5;
            if self.top_at(mid).x < point.x {
                low = mid;
            } else {
                high = mid;
            }
        }

        let top = self.top_at((low + high) * 0.5).y;
        point.y >= top && point.y <= top + self.width.max(1.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SankeyLayout {
    pub nodes: Vec<NodeBox>,
    pub links: Vec<LinkBand>,
    pub columns: usize,
    /// Pixels per unit of flow.
    pub scale: f32,
}

impl SankeyLayout {
    pub fn compute(graph: &FlowGraph, bounds: Rect, config: LayoutConfig) -> Self {
        let n = graph.nodes.len();
        if n == 0 {
            return Self::default();
        }

        let columns_by_node = assign_columns(graph);
        let columns = columns_by_node.iter().copied().max().unwrap_or(0) + 1;
        let values = (0..n)
            .map(|index| graph.throughput(index) as f32)
            .collect::<Vec<_>>();

        let mut members = vec![Vec::new(); columns];
        for (index, &column) in columns_by_node.iter().enumerate() {
            members[column].push(index);
        }

        let scale = members
            .iter()
            .filter_map(|column| {
                let total = column.iter().map(|&index| values[index]).sum::<f32>();
                if total <= 0.0 {
                    return None;
                }
                let padding = config.node_padding * column.len().saturating_sub(1) as f32;
                Some(((bounds.height() - padding).max(0.0)) / total)
            })
            .fold(f32::INFINITY, f32::min);
        let scale = if scale.is_finite() { scale } else { 0.0 };

        let column_step = if columns > 1 {
            (bounds.width() - config.node_width).max(0.0) / (columns - 1) as f32
        } else {
            0.0
        };

        let mut rects = vec![Rect::NOTHING; n];
        for (column, column_members) in members.iter().enumerate() {
            let heights = column_members
                .iter()
                .map(|&index| (values[index] * scale).max(config.min_node_height))
                .collect::<Vec<_>>();
            let total = heights.iter().sum::<f32>()
                + config.node_padding * column_members.len().saturating_sub(1) as f32;

            let x = bounds.left() + column as f32 * column_step;
            let mut y = bounds.top() + ((bounds.height() - total) * 0.5).max(0.0);
            for (&index, height) in column_members.iter().zip(heights) {
                rects[index] = Rect::from_min_max(pos2(x, y), pos2(x + config.node_width, y + height));
                y += height + config.node_padding;
            }
        }

        let links = stack_links(graph, &rects, scale);
        let nodes = rects
            .into_iter()
            .zip(columns_by_node)
            .map(|(rect, column)| NodeBox { rect, column })
            .collect();

        Self {
            nodes,
            links,
            columns,
            scale,
        }
    }

    pub fn node_at(&self, point: Pos2) -> Option<usize> {
        self.nodes.iter().position(|node| node.rect.contains(point))
    }

    /// Topmost-drawn link under `point`; later links are painted over earlier ones.
    pub fn link_at(&self, point: Pos2) -> Option<usize> {
        self.links.iter().rposition(|link| link.contains(point))
    }
}

fn assign_columns(graph: &FlowGraph) -> Vec<usize> {
    let n = graph.nodes.len();
    let mut depth = vec![0usize; n];

    // Longest path from a source; bounded passes keep cycles finite.
    for _ in 0..n {
        let mut changed = false;
        for link in &graph.links {
            let candidate = (depth[link.source] + 1).min(n - 1);
            if link.source != link.target && candidate > depth[link.target] {
                depth[link.target] = candidate;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut has_out = vec![false; n];
    let mut linked = vec![false; n];
    for link in &graph.links {
        has_out[link.source] = true;
        linked[link.source] = true;
        linked[link.target] = true;
    }

    let max_depth = (0..n)
        .filter(|&index| linked[index])
        .map(|index| depth[index])
        .max()
        .unwrap_or(0);
    let last_rank = NodeCategory::Sink.rank() as f32;

    (0..n)
        .map(|index| {
            if !linked[index] {
                let rank = graph.nodes[index].category.rank() as f32;
                (rank / last_rank * max_depth as f32).round() as usize
            } else if !has_out[index] {
                max_depth
            } else {
                depth[index]
            }
        })
        .collect()
}

fn stack_links(graph: &FlowGraph, rects: &[Rect], scale: f32) -> Vec<LinkBand> {
    let mut outgoing = vec![Vec::new(); rects.len()];
    let mut incoming = vec![Vec::new(); rects.len()];
    for (link_index, link) in graph.links.iter().enumerate() {
        outgoing[link.source].push(link_index);
        incoming[link.target].push(link_index);
    }

    let mut source_offsets = vec![0.0f32; graph.links.len()];
    let mut target_offsets = vec![0.0f32; graph.links.len()];

    for (node, links) in outgoing.iter_mut().enumerate() {
        links.sort_by(|a, b| {
            let a = rects[graph.links[*a].target].center().y;
            let b = rects[graph.links[*b].target].center().y;
            a.total_cmp(&b)
        });
        let mut offset = 0.0;
        for &link_index in links.iter() {
            source_offsets[link_index] = rects[node].top() + offset;
            offset += graph.links[link_index].value as f32 * scale;
        }
    }

    for (node, links) in incoming.iter_mut().enumerate() {
        links.sort_by(|a, b| {
            let a = rects[graph.links[*a].source].center().y;
            let b = rects[graph.links[*b].source].center().y;
            a.total_cmp(&b)
        });
        let mut offset = 0.0;
        for &link_index in links.iter() {
            target_offsets[link_index] = rects[node].top() + offset;
            offset += graph.links[link_index].value as f32 * scale;
        }
    }

    graph
        .links
        .iter()
        .enumerate()
        .map(|(link_index, link)| LinkBand {
            source_top: pos2(rects[link.source].right(), source_offsets[link_index]),
            target_top: pos2(rects[link.target].left(), target_offsets[link_index]),
            width: link.value as f32 * scale,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ColorPalette, FlowRecord};

    fn bounds() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 500.0))
    }

    fn chain() -> FlowGraph {
        let records = vec![
            FlowRecord::new("electricity", "aluminum", 6.0),
            FlowRecord::new("heat", "aluminum", 2.0),
            FlowRecord::new("aluminum", "cables", 8.0),
            FlowRecord::new("cables", "grid status quo", 8.0),
        ];
        FlowGraph::build(&records, &ColorPalette::grid(), 0.1)
    }

    #[test]
    fn columns_follow_longest_path() {
        let graph = chain();
        let layout = SankeyLayout::compute(&graph, bounds(), LayoutConfig::default());
        let columns = layout.nodes.iter().map(|node| node.column).collect::<Vec<_>>();
        // electricity, aluminum, heat, cables, grid status quo
        assert_eq!(columns, vec![0, 1, 0, 2, 3]);
        assert_eq!(layout.columns, 4);
        assert_eq!(layout.nodes[0].rect.left(), 0.0);
        assert!((layout.nodes[4].rect.right() - 800.0).abs() < 1e-3);
    }

    #[test]
    fn heights_are_proportional_and_fit() {
        let graph = chain();
        let layout = SankeyLayout::compute(&graph, bounds(), LayoutConfig::default());
        let electricity = layout.nodes[0].rect.height();
        let heat = layout.nodes[2].rect.height();
        assert!((electricity / heat - 3.0).abs() < 1e-3);

        for node in &layout.nodes {
            assert!(node.rect.top() >= 0.0 && node.rect.bottom() <= 500.0 + 1e-3);
        }
    }

    #[test]
    fn links_stack_inside_their_nodes() {
        let graph = chain();
        let layout = SankeyLayout::compute(&graph, bounds(), LayoutConfig::default());
        let aluminum = layout.nodes[1].rect;

        let into_aluminum = graph
            .links
            .iter()
            .zip(&layout.links)
            .filter(|(link, _)| link.target == 1)
            .map(|(_, band)| band)
            .collect::<Vec<_>>();
        let filled = into_aluminum.iter().map(|band| band.width).sum::<f32>();
        assert!((filled - aluminum.height()).abs() < 1e-3);
        assert!((into_aluminum[0].target_top.y - aluminum.top()).abs() < 1e-3);
        assert!((into_aluminum[1].target_top.y - (aluminum.top() + into_aluminum[0].width)).abs() < 1e-3);
    }

    #[test]
    fn hit_testing_finds_band_and_node() {
        let graph = chain();
        let layout = SankeyLayout::compute(&graph, bounds(), LayoutConfig::default());
        let band = layout.links[2];
        let middle = band.top_at(0.5);
        let inside = pos2(middle.x, middle.y + band.width * 0.5);

        assert_eq!(layout.link_at(inside), Some(2));
        assert_eq!(layout.link_at(pos2(middle.x, middle.y - 30.0)), None);
        assert_eq!(layout.node_at(layout.nodes[3].rect.center()), Some(3));
    }

    #[test]
    fn dead_nodes_are_placed_by_category() {
        let records = vec![
            FlowRecord::new("SF6", "aluminum", 0.001),
            FlowRecord::new("electricity", "aluminum", 6.0),
            FlowRecord::new("aluminum", "cables", 6.0),
            FlowRecord::new("cables", "grid status quo", 6.0),
        ];
        let graph = FlowGraph::build(&records, &ColorPalette::grid(), 0.1);
        let layout = SankeyLayout::compute(&graph, bounds(), LayoutConfig::default());
        // SF6 is a material with no kept link.
        assert_eq!(layout.nodes[0].column, 1);
        assert_eq!(layout.nodes[0].rect.height(), LayoutConfig::default().min_node_height);
    }

    #[test]
    fn cycles_terminate() {
        let records = vec![FlowRecord::new("a", "b", 1.0), FlowRecord::new("b", "a", 1.0)];
        let graph = FlowGraph::build(&records, &ColorPalette::new(), 0.0);
        let layout = SankeyLayout::compute(&graph, bounds(), LayoutConfig::default());
        assert_eq!(layout.nodes.len(), 2);
        assert!(layout.columns <= 2);
    }

    #[test]
    fn empty_graph_has_empty_layout() {
        let layout =
            SankeyLayout::compute(&FlowGraph::default(), bounds(), LayoutConfig::default());
        assert_eq!(layout, SankeyLayout::default());
    }
}
