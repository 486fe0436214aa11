use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use eframe::egui::{
    self, Align2, Color32, FontId, Mesh, Rect, RichText, Sense, Shape, Stroke, Ui, pos2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use grid_lca_explorer::flow::{DEFAULT_MIN_FLOW, FlowGraph, NodeCategory};
use grid_lca_explorer::util::{capitalize, format_impact, truncate_label};

use super::super::charts::legend;
use super::super::render_utils::{blend_color, hex_color, text_color, with_alpha};
use super::super::{SearchMatchCache, ViewModel};

const SINK_NAME: &str = "grid status quo";
const LABEL_CHARS: usize = 12;
const RIBBON_SEGMENTS: usize = 32;
const SLIDER_MAX_FLOW: f64 = 5.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Slider range; widened so a larger launch threshold is not clamped away.
fn min_flow_range(current: f64) -> RangeInclusive<f64> {
    0.0..=current.max(SLIDER_MAX_FLOW)
}

#[derive(Clone, Copy)]
enum Hovered {
    Node(usize),
    Link(usize),
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim().to_owned();
        if query.is_empty() {
            return None;
        }

        let revision = self.catalog.revision();
        if let Some(cached) = &self.search_match_cache
            && cached.catalog_revision == revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .flow_graph()
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.name, &query).map(|_| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query,
            catalog_revision: revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_flow_controls(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            let range = min_flow_range(self.min_flow);
            ui.add(
                egui::Slider::new(&mut self.min_flow, range)
                    .logarithmic(true)
                    .max_decimals(3)
                    .text("Minimum flow (Mt CO₂-eq)"),
            )
            .on_hover_text("Flows at or below this value are hidden; their nodes stay listed.");
            if ui
                .add_enabled(self.min_flow != DEFAULT_MIN_FLOW, egui::Button::new("Reset"))
                .clicked()
            {
                self.min_flow = DEFAULT_MIN_FLOW;
            }

            ui.separator();
            ui.label("Search");
            ui.add(egui::TextEdit::singleline(&mut self.search).desired_width(160.0))
                .on_hover_text("Fuzzy-highlight nodes and the flows touching them.");

            ui.separator();
            ui.checkbox(&mut self.show_link_values, "Show flow values");
        });
    }

    pub(in crate::app) fn draw_flow_summary(&mut self, ui: &mut Ui) {
        let graph = self.flow_graph();
        let total = graph.total_into(SINK_NAME).unwrap_or_else(|| {
            graph
                .nodes_in(NodeCategory::Sink)
                .into_iter()
                .map(|index| graph.inflow(index))
                .sum()
        });
        let dead = graph
            .dead_nodes()
            .into_iter()
            .map(|index| graph.nodes[index].name.clone())
            .collect::<Vec<_>>();
        let node_count = graph.nodes.len();
        let link_count = graph.links.len();

        ui.horizontal_wrapped(|ui| {
            ui.label("Total climate impact:");
            ui.label(RichText::new(format_impact(total)).strong());
            ui.separator();
            ui.weak(format!("{node_count} nodes / {link_count} flows"));
        });
        ui.weak("Flow from processes → materials → components → grid");

        if !dead.is_empty() {
            ui.colored_label(
                ui.visuals().warn_fg_color,
                format!("No visible flows at this threshold: {}", dead.join(", ")),
            );
        }
    }

    pub(in crate::app) fn draw_flow_diagram(&mut self, ui: &mut Ui) {
        let matches = self.cached_search_matches();
        let show_values = self.show_link_values;

        let width = ui.available_width().max(600.0);
        let (rect, response) = ui.allocate_exact_size(vec2(width, 520.0), Sense::hover());
        let bounds = Rect::from_min_max(
            pos2(rect.left() + 150.0, rect.top() + 20.0),
            pos2(rect.right() - 150.0, rect.bottom() - 20.0),
        );

        let painter = ui.painter_at(rect);
        let label_color = text_color(ui);
        let background = ui.visuals().panel_fill;
        let (graph, layout) = self.flow_layout(bounds);

        if graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The flow catalog is empty.",
                FontId::proportional(14.0),
                label_color,
            );
            return;
        }

        let hovered = response.hover_pos().and_then(|pointer| {
            layout
                .node_at(pointer)
                .map(Hovered::Node)
                .or_else(|| layout.link_at(pointer).map(Hovered::Link))
        });

        let highlighted = |source: usize, target: usize| match &matches {
            Some(matches) => matches.contains(&source) || matches.contains(&target),
            None => true,
        };

        for (index, (link, band)) in graph.links.iter().zip(&layout.links).enumerate() {
            let base = hex_color(&graph.nodes[link.source].color);
            let emphasis = match hovered {
                Some(Hovered::Link(hovered)) if hovered == index => 1.6,
                Some(Hovered::Node(node)) if node == link.source || node == link.target => 1.4,
                _ if !highlighted(link.source, link.target) => 0.25,
                _ => 1.0,
            };

            let top = band.sample_top(RIBBON_SEGMENTS);
            let mut mesh = Mesh::default();
            let last = (top.len() - 1) as f32;
            for (step, point) in top.iter().enumerate() {
                let t = step as f32 / last;
                let alpha = ((0.5 - 0.3 * t) * emphasis).min(0.9);
                let color = with_alpha(base, alpha);
                mesh.colored_vertex(*point, color);
                mesh.colored_vertex(*point + vec2(0.0, band.width.max(1.0)), color);
            }
            for step in 0..(top.len() as u32).saturating_sub(1) {
                let base_index = step * 2;
                mesh.add_triangle(base_index, base_index + 1, base_index + 2);
                mesh.add_triangle(base_index + 1, base_index + 3, base_index + 2);
            }
            painter.add(Shape::mesh(mesh));

            if show_values && band.width > 10.0 {
                let middle = band.top_at(0.5);
                painter.text(
                    middle + vec2(0.0, band.width * 0.5),
                    Align2::CENTER_CENTER,
                    format!("{:.2}", link.value),
                    FontId::proportional(10.0),
                    label_color,
                );
            }
        }

        let last_column = layout.columns.saturating_sub(1);
        for (index, (node, node_box)) in graph.nodes.iter().zip(&layout.nodes).enumerate() {
            let mut fill = with_alpha(hex_color(&node.color), 0.9);
            let dimmed = matches
                .as_ref()
                .is_some_and(|matches| !matches.contains(&index));
            if dimmed {
                fill = blend_color(fill, background, 0.7);
            }
            painter.rect_filled(node_box.rect, 2.0, fill);
            if matches!(hovered, Some(Hovered::Node(hovered)) if hovered == index) {
                painter.rect_stroke(
                    node_box.rect.expand(1.5),
                    2.0,
                    Stroke::new(1.5, label_color),
                    egui::StrokeKind::Outside,
                );
            }

            if node_box.rect.height() <= 15.0 {
                continue;
            }

            let label = truncate_label(&node.name, LABEL_CHARS);
            let center_y = node_box.rect.center().y;
            let (position, align) = if node_box.column == 0 {
                (pos2(node_box.rect.right() + 6.0, center_y), Align2::LEFT_CENTER)
            } else if node_box.column == last_column {
                (pos2(node_box.rect.left() - 6.0, center_y), Align2::RIGHT_CENTER)
            } else {
                (node_box.rect.center(), Align2::CENTER_CENTER)
            };
            painter.text(position, align, label, FontId::proportional(10.0), label_color);
        }

        let tooltip = hovered.map(|hovered| tooltip_text(graph, hovered));
        if let Some(text) = tooltip {
            response.on_hover_text_at_pointer(text);
        }
    }

    pub(in crate::app) fn draw_flow_legend(&mut self, ui: &mut Ui) {
        let graph = self.flow_graph();
        let groups = NodeCategory::ALL
            .iter()
            .map(|category| {
                let entries = graph
                    .nodes_in(*category)
                    .into_iter()
                    .map(|index| {
                        let node = &graph.nodes[index];
                        (capitalize(&node.name), hex_color(&node.color))
                    })
                    .collect::<Vec<(String, Color32)>>();
                (category.label(), entries)
            })
            .collect::<Vec<_>>();

        ui.columns(groups.len().max(1), |columns| {
            for (column, (title, entries)) in columns.iter_mut().zip(&groups) {
                column.label(RichText::new(*title).strong());
                legend(column, entries);
            }
        });
    }
}

fn tooltip_text(graph: &FlowGraph, hovered: Hovered) -> String {
    match hovered {
        Hovered::Link(index) => {
            let link = &graph.links[index];
            format!(
                "{} → {}\n{}",
                link.source_name,
                link.target_name,
                format_impact(link.value)
            )
        }
        Hovered::Node(index) => {
            let node = &graph.nodes[index];
            format!(
                "{}\n{}: {}",
                node.name,
                node.category.label(),
                format_impact(graph.throughput(index))
            )
        }
    }
}
