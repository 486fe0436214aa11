use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::category::{NodeCategory, classify_nodes};
use super::palette::ColorPalette;
use super::record::FlowRecord;

/// Flows at or below this magnitude are dropped from the diagram links.
pub const DEFAULT_MIN_FLOW: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowNode {
    pub name: String,
    pub category: NodeCategory,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub source_name: String,
    pub target_name: String,
}

/// Node and link lists ready for a Sankey layout.
///
/// Nodes are discovered over every record, links only over records whose
/// value is strictly above the threshold. A node whose flows were all
/// filtered out therefore stays in `nodes` without any link.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

/// Names in first-seen order (source before target) and their positions.
fn discover_nodes(records: &[FlowRecord]) -> (Vec<String>, HashMap<&str, usize>) {
    let mut names = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for record in records {
        for name in [record.source.as_str(), record.target.as_str()] {
            if !index_by_name.contains_key(name) {
                index_by_name.insert(name, names.len());
                names.push(name.to_owned());
            }
        }
    }

    (names, index_by_name)
}

impl FlowGraph {
    pub fn build(records: &[FlowRecord], palette: &ColorPalette, min_value: f64) -> Self {
        let (names, index_by_name) = discover_nodes(records);
        let categories = classify_nodes(&names, records);
        let nodes = names
            .iter()
            .zip(categories)
            .map(|(name, category)| FlowNode {
                color: palette.color_for(name).to_owned(),
                name: name.clone(),
                category,
            })
            .collect::<Vec<_>>();

        let links = records
            .iter()
            .filter(|record| record.value > min_value)
            .map(|record| FlowLink {
                source: index_by_name[record.source.as_str()],
                target: index_by_name[record.target.as_str()],
                value: record.value,
                source_name: record.source.clone(),
                target_name: record.target.clone(),
            })
            .collect::<Vec<_>>();

        debug!(
            records = records.len(),
            nodes = nodes.len(),
            links = links.len(),
            min_value,
            "built flow graph"
        );

        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    pub fn links_from(&self, index: usize) -> impl Iterator<Item = &FlowLink> {
        self.links.iter().filter(move |link| link.source == index)
    }

    pub fn links_into(&self, index: usize) -> impl Iterator<Item = &FlowLink> {
        self.links.iter().filter(move |link| link.target == index)
    }

    pub fn inflow(&self, index: usize) -> f64 {
        self.links_into(index).map(|link| link.value).sum()
    }

    pub fn outflow(&self, index: usize) -> f64 {
        self.links_from(index).map(|link| link.value).sum()
    }

    /// Magnitude drawn for a node: the larger of what enters and what leaves it.
    pub fn throughput(&self, index: usize) -> f64 {
        self.inflow(index).max(self.outflow(index))
    }

    pub fn total_into(&self, name: &str) -> Option<f64> {
        self.node_index(name).map(|index| self.inflow(index))
    }

    pub fn total_link_value(&self) -> f64 {
        self.links.iter().map(|link| link.value).sum()
    }

    /// Indices of nodes that kept no link after filtering.
    pub fn dead_nodes(&self) -> Vec<usize> {
        let mut linked = vec![false; self.nodes.len()];
        for link in &self.links {
            linked[link.source] = true;
            linked[link.target] = true;
        }

        linked
            .into_iter()
            .enumerate()
            .filter_map(|(index, is_linked)| (!is_linked).then_some(index))
            .collect()
    }

    pub fn nodes_in(&self, category: NodeCategory) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| (node.category == category).then_some(index))
            .collect()
    }

    /// Link values between nodes of two categories, rows in node order.
    ///
    /// Only the kept links count; see [`ContributionMatrix::from_records`]
    /// for a table that ignores the threshold.
    pub fn matrix(&self, rows: NodeCategory, columns: NodeCategory) -> ContributionMatrix {
        let names = self
            .nodes
            .iter()
            .map(|node| node.name.clone())
            .collect::<Vec<_>>();
        ContributionMatrix::collect(
            &names,
            &self.nodes_in(rows),
            &self.nodes_in(columns),
            self.links
                .iter()
                .map(|link| (link.source, link.target, link.value)),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContributionMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl ContributionMatrix {
    /// Every record between the two categories, whatever its magnitude.
    pub fn from_records(records: &[FlowRecord], rows: NodeCategory, columns: NodeCategory) -> Self {
        let (names, index_by_name) = discover_nodes(records);
        let categories = classify_nodes(&names, records);
        let indices_of = |wanted: NodeCategory| {
            categories
                .iter()
                .enumerate()
                .filter_map(|(index, category)| (*category == wanted).then_some(index))
                .collect::<Vec<_>>()
        };

        Self::collect(
            &names,
            &indices_of(rows),
            &indices_of(columns),
            records.iter().map(|record| {
                (
                    index_by_name[record.source.as_str()],
                    index_by_name[record.target.as_str()],
                    record.value,
                )
            }),
        )
    }

    fn collect(
        names: &[String],
        row_indices: &[usize],
        column_indices: &[usize],
        flows: impl Iterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let mut values = vec![vec![0.0; column_indices.len()]; row_indices.len()];

        for (source, target, value) in flows {
            let row = row_indices.iter().position(|&index| index == source);
            let column = column_indices.iter().position(|&index| index == target);
            if let (Some(row), Some(column)) = (row, column) {
                values[row][column] += value;
            }
        }

        Self {
            rows: row_indices.iter().map(|&index| names[index].clone()).collect(),
            columns: column_indices
                .iter()
                .map(|&index| names[index].clone())
                .collect(),
            values,
        }
    }

    pub fn value(&self, row: &str, column: &str) -> Option<f64> {
        let row = self.rows.iter().position(|name| name == row)?;
        let column = self.columns.iter().position(|name| name == column)?;
        Some(self.values[row][column])
    }

    pub fn row_total(&self, row: usize) -> f64 {
        self.values.get(row).map(|row| row.iter().sum()).unwrap_or(0.0)
    }

    pub fn max_row_total(&self) -> f64 {
        (0..self.rows.len())
            .map(|row| self.row_total(row))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::flow::palette::DEFAULT_NODE_COLOR;

    fn component_records() -> Vec<FlowRecord> {
        vec![
            FlowRecord::new("cables", "grid status quo", 24.218414),
            FlowRecord::new("overhead lines", "grid status quo", 34.697415),
            FlowRecord::new("substations", "grid status quo", 1.190506),
            FlowRecord::new("switchgears", "grid status quo", 0.976867),
            FlowRecord::new("transformers", "grid status quo", 3.675580),
        ]
    }

    fn node_names(graph: &FlowGraph) -> Vec<&str> {
        graph.nodes.iter().map(|node| node.name.as_str()).collect()
    }

    #[test]
    fn discovery_keeps_first_seen_order() {
        let graph = FlowGraph::build(&component_records(), &ColorPalette::grid(), DEFAULT_MIN_FLOW);
        assert_eq!(
            node_names(&graph),
            vec![
                "cables",
                "grid status quo",
                "overhead lines",
                "substations",
                "switchgears",
                "transformers",
            ]
        );
        assert_eq!(graph.links.len(), 5);
        assert!(graph.links.iter().all(|link| link.target == 1));
    }

    #[test]
    fn equal_to_threshold_is_dropped() {
        let records = vec![
            FlowRecord::new("a", "b", 0.1),
            FlowRecord::new("a", "c", 0.1 + 1e-9),
        ];
        let graph = FlowGraph::build(&records, &ColorPalette::new(), 0.1);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].target_name, "c");
    }

    #[test]
    fn filtered_nodes_stay_in_the_node_list() {
        let records = vec![
            FlowRecord::new("SF6", "aluminum", 0.001423),
            FlowRecord::new("electricity", "aluminum", 17.367558),
        ];
        let graph = FlowGraph::build(&records, &ColorPalette::grid(), DEFAULT_MIN_FLOW);
        assert_eq!(node_names(&graph), vec!["SF6", "aluminum", "electricity"]);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.dead_nodes(), vec![0]);
    }

    #[test]
    fn link_order_matches_record_order() {
        let records = vec![
            FlowRecord::new("x", "y", 3.0),
            FlowRecord::new("y", "z", 0.05),
            FlowRecord::new("w", "x", 1.0),
            FlowRecord::new("y", "x", 2.0),
        ];
        let graph = FlowGraph::build(&records, &ColorPalette::new(), DEFAULT_MIN_FLOW);
        let pairs = graph
            .links
            .iter()
            .map(|link| (link.source, link.target, link.value))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(0, 1, 3.0), (3, 0, 1.0), (1, 0, 2.0)]);
    }

    #[test]
    fn duplicate_pairs_are_not_merged() {
        let records = vec![FlowRecord::new("a", "b", 1.0), FlowRecord::new("a", "b", 2.0)];
        let graph = FlowGraph::build(&records, &ColorPalette::new(), 0.0);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 2);
        assert_eq!(graph.inflow(1), 3.0);
    }

    #[test]
    fn colors_come_from_palette_with_fallback() {
        let records = vec![FlowRecord::new("hydrogen", "grid status quo", 1.0)];
        let graph = FlowGraph::build(&records, &ColorPalette::grid(), DEFAULT_MIN_FLOW);
        assert_eq!(graph.nodes[0].color, DEFAULT_NODE_COLOR);
        assert_eq!(graph.nodes[1].color, "#17becf");
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = FlowGraph::build(&[], &ColorPalette::grid(), DEFAULT_MIN_FLOW);
        assert_eq!(graph, FlowGraph::default());
        assert!(graph.dead_nodes().is_empty());
        assert_eq!(graph.total_into("grid status quo"), None);
    }

    #[test]
    fn throughput_takes_larger_side() {
        let records = vec![
            FlowRecord::new("p", "m", 2.0),
            FlowRecord::new("q", "m", 1.5),
            FlowRecord::new("m", "c", 3.0),
        ];
        let graph = FlowGraph::build(&records, &ColorPalette::new(), 0.0);
        let m = graph.node_index("m").unwrap();
        assert_eq!(graph.inflow(m), 3.5);
        assert_eq!(graph.outflow(m), 3.0);
        assert_eq!(graph.throughput(m), 3.5);
    }

    #[test]
    fn matrix_groups_material_into_component_flows() {
        let records = vec![
            FlowRecord::new("aluminum", "cables", 16.118099),
            FlowRecord::new("copper", "cables", 2.688939),
            FlowRecord::new("aluminum", "overhead lines", 18.130967),
            FlowRecord::new("electricity", "aluminum", 17.367558),
        ];
        let graph = FlowGraph::build(&records, &ColorPalette::grid(), DEFAULT_MIN_FLOW);
        let matrix = graph.matrix(NodeCategory::Material, NodeCategory::Component);

        assert_eq!(matrix.rows, vec!["aluminum", "copper"]);
        assert_eq!(matrix.columns, vec!["cables", "overhead lines"]);
        assert_eq!(matrix.value("copper", "overhead lines"), Some(0.0));
        assert_eq!(matrix.value("aluminum", "cables"), Some(16.118099));
        assert!((matrix.row_total(0) - 34.249066).abs() < 1e-9);
        assert_eq!(matrix.value("electricity", "cables"), None);
    }

    #[test]
    fn record_matrix_keeps_flows_below_any_threshold() {
        let records = vec![
            FlowRecord::new("copper", "switchgears", 0.044161),
            FlowRecord::new("copper", "cables", 2.688939),
            FlowRecord::new("cables", "grid status quo", 24.218414),
            FlowRecord::new("switchgears", "grid status quo", 0.976867),
        ];
        let from_records =
            ContributionMatrix::from_records(&records, NodeCategory::Material, NodeCategory::Component);
        let filtered = FlowGraph::build(&records, &ColorPalette::grid(), 5.0)
            .matrix(NodeCategory::Material, NodeCategory::Component);

        assert_eq!(from_records.rows, filtered.rows);
        assert_eq!(from_records.columns, filtered.columns);
        assert_eq!(from_records.value("copper", "switchgears"), Some(0.044161));
        assert_eq!(from_records.value("copper", "cables"), Some(2.688939));
        assert_eq!(filtered.value("copper", "cables"), Some(0.0));
    }
}
