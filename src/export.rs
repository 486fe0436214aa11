use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::flow::{FlowCatalog, FlowGraph};

#[derive(Debug, Serialize)]
pub struct GraphExport<'a> {
    pub catalog_revision: String,
    pub min_flow: f64,
    pub dead_nodes: Vec<&'a str>,
    pub graph: &'a FlowGraph,
}

impl<'a> GraphExport<'a> {
    pub fn new(catalog: &FlowCatalog, graph: &'a FlowGraph, min_flow: f64) -> Self {
        Self {
            catalog_revision: format!("{:016x}", catalog.revision()),
            min_flow,
            dead_nodes: graph
                .dead_nodes()
                .into_iter()
                .map(|index| graph.nodes[index].name.as_str())
                .collect(),
            graph,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize flow graph")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create export file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("failed to write flow graph to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;

        info!(
            path = %path.display(),
            nodes = self.graph.nodes.len(),
            links = self.graph.links.len(),
            "exported flow graph"
        );
        Ok(())
    }
}
