use std::collections::HashSet;

use grid_lca_explorer::flow::{
    ColorPalette, ContributionMatrix, DEFAULT_MIN_FLOW, DEFAULT_NODE_COLOR, FlowCatalog,
    FlowGraph, FlowRecord, NodeCategory,
};
use pretty_assertions::assert_eq;

fn grid_components() -> Vec<FlowRecord> {
    vec![
        FlowRecord::new("cables", "grid status quo", 24.218414),
        FlowRecord::new("overhead lines", "grid status quo", 34.697415),
        FlowRecord::new("substations", "grid status quo", 1.190506),
        FlowRecord::new("switchgears", "grid status quo", 0.976867),
        FlowRecord::new("transformers", "grid status quo", 3.675580),
    ]
}

fn full_catalog() -> FlowCatalog {
    FlowCatalog::embedded().expect("embedded catalog is valid")
}

#[test]
fn component_totals_are_conserved() {
    let graph = FlowGraph::build(&grid_components(), &ColorPalette::grid(), DEFAULT_MIN_FLOW);

    assert_eq!(graph.nodes.len(), 6);
    assert_eq!(graph.links.len(), 5);

    let names = graph
        .nodes
        .iter()
        .map(|node| node.name.as_str())
        .collect::<HashSet<_>>();
    let expected = [
        "cables",
        "overhead lines",
        "substations",
        "switchgears",
        "transformers",
        "grid status quo",
    ]
    .into_iter()
    .collect::<HashSet<_>>();
    assert_eq!(names, expected);

    let total = graph.total_link_value();
    assert!((total - 64.758782).abs() < 1e-6);
    assert_eq!(format!("{total:.2}"), "64.76");
    assert_eq!(graph.total_into("grid status quo"), Some(total));
}

#[test]
fn build_is_deterministic() {
    let catalog = full_catalog();
    let palette = ColorPalette::grid();
    let first = FlowGraph::build(catalog.records(), &palette, DEFAULT_MIN_FLOW);
    let second = FlowGraph::build(catalog.records(), &palette, DEFAULT_MIN_FLOW);
    assert_eq!(first, second);
}

#[test]
fn every_name_becomes_a_node_for_any_threshold() {
    let catalog = full_catalog();
    let expected = catalog
        .records()
        .iter()
        .flat_map(|record| [record.source.as_str(), record.target.as_str()])
        .collect::<HashSet<_>>();

    for threshold in [0.0, DEFAULT_MIN_FLOW, 1.0, 100.0] {
        let graph = FlowGraph::build(catalog.records(), &ColorPalette::grid(), threshold);
        let names = graph
            .nodes
            .iter()
            .map(|node| node.name.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(names, expected, "threshold {threshold}");
        assert_eq!(names.len(), graph.nodes.len(), "duplicate nodes at {threshold}");
    }
}

#[test]
fn links_are_the_stable_filtered_records() {
    let catalog = full_catalog();
    let graph = FlowGraph::build(catalog.records(), &ColorPalette::grid(), DEFAULT_MIN_FLOW);

    let kept = catalog
        .records()
        .iter()
        .filter(|record| record.value > DEFAULT_MIN_FLOW)
        .map(|record| (record.source.as_str(), record.target.as_str(), record.value))
        .collect::<Vec<_>>();
    let links = graph
        .links
        .iter()
        .map(|link| (link.source_name.as_str(), link.target_name.as_str(), link.value))
        .collect::<Vec<_>>();
    assert_eq!(links, kept);

    for link in &graph.links {
        assert!(link.value > DEFAULT_MIN_FLOW);
        assert!(link.source < graph.nodes.len());
        assert!(link.target < graph.nodes.len());
        assert_eq!(graph.nodes[link.source].name, link.source_name);
        assert_eq!(graph.nodes[link.target].name, link.target_name);
    }
}

#[test]
fn sf6_survives_as_a_node_through_other_materials() {
    let graph = FlowGraph::build(
        full_catalog().records(),
        &ColorPalette::grid(),
        DEFAULT_MIN_FLOW,
    );
    let sf6 = graph.node_index("SF6").expect("SF6 is a node");
    assert!(graph.links_from(sf6).any(|link| link.target_name == "switchgears"));
    assert!(graph.links_into(sf6).next().is_none());
    assert!(graph.dead_nodes().is_empty());
}

#[test]
fn categories_cover_the_four_layers() {
    let graph = FlowGraph::build(
        full_catalog().records(),
        &ColorPalette::grid(),
        DEFAULT_MIN_FLOW,
    );
    let count = |category| graph.nodes_in(category).len();
    assert_eq!(count(NodeCategory::Process), 8);
    assert_eq!(count(NodeCategory::Material), 7);
    assert_eq!(count(NodeCategory::Component), 5);
    assert_eq!(count(NodeCategory::Sink), 1);
    assert!(graph.nodes.iter().all(|node| node.color != DEFAULT_NODE_COLOR
        || node.name == "concrete"));
}

#[test]
fn material_matrix_matches_component_inflows() {
    let catalog = full_catalog();
    let matrix = ContributionMatrix::from_records(
        catalog.records(),
        NodeCategory::Material,
        NodeCategory::Component,
    );

    let aluminum_in_lines = matrix.value("aluminum", "overhead lines").unwrap();
    assert!((aluminum_in_lines - 18.130967).abs() < 1e-9);
    let plastics_in_lines = matrix.value("plastics", "overhead lines").unwrap();
    assert!((plastics_in_lines - 0.007423).abs() < 1e-9);
    assert!((matrix.value("copper", "switchgears").unwrap() - 0.044161).abs() < 1e-9);
    assert!((matrix.value("other materials", "switchgears").unwrap() - 0.036310).abs() < 1e-9);

    let unfiltered = FlowGraph::build(catalog.records(), &ColorPalette::grid(), 0.0);
    for (column, component) in matrix.columns.iter().enumerate() {
        let index = unfiltered.node_index(component).unwrap();
        let column_total = matrix.values.iter().map(|row| row[column]).sum::<f64>();
        assert!((column_total - unfiltered.inflow(index)).abs() < 1e-9, "{component}");
    }
}

#[test]
fn material_matrix_does_not_follow_the_threshold() {
    let catalog = full_catalog();
    let matrix = ContributionMatrix::from_records(
        catalog.records(),
        NodeCategory::Material,
        NodeCategory::Component,
    );

    for min_flow in [DEFAULT_MIN_FLOW, 1.0, 5.0] {
        let graph = FlowGraph::build(catalog.records(), &ColorPalette::grid(), min_flow);
        let filtered = graph.matrix(NodeCategory::Material, NodeCategory::Component);
        assert_eq!(filtered.rows, matrix.rows);
        assert_eq!(filtered.columns, matrix.columns);
    }

    let strict = FlowGraph::build(catalog.records(), &ColorPalette::grid(), 5.0)
        .matrix(NodeCategory::Material, NodeCategory::Component);
    assert_eq!(strict.value("copper", "cables"), Some(0.0));
    assert!((matrix.value("copper", "cables").unwrap() - 2.688939).abs() < 1e-9);
}

#[test]
fn empty_catalog_builds_empty_graph() {
    let catalog = FlowCatalog::new(Vec::new()).unwrap();
    let graph = FlowGraph::build(catalog.records(), &ColorPalette::grid(), DEFAULT_MIN_FLOW);
    assert!(graph.nodes.is_empty());
    assert!(graph.links.is_empty());
}
