mod app;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, ValueEnum};
use eframe::egui::ThemePreference;
use tracing::info;
use tracing_subscriber::EnvFilter;

use grid_lca_explorer::export::GraphExport;
use grid_lca_explorer::flow::{ColorPalette, DEFAULT_MIN_FLOW, FlowCatalog, FlowGraph};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for ThemePreference {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::System => Self::System,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Flow catalog to load (.csv or .json); the bundled catalog when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Flows at or below this value are left out of the diagram.
    #[arg(long, default_value_t = DEFAULT_MIN_FLOW)]
    min_flow: f64,

    #[arg(long, value_enum, default_value_t = ThemeArg::System)]
    theme: ThemeArg,

    /// Write the built flow graph as JSON and exit without opening a window.
    #[arg(long, value_name = "PATH")]
    export_graph: Option<PathBuf>,

    /// Log filter directives; overrides RUST_LOG.
    #[arg(long)]
    log_filter: Option<String>,
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter {directives:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn export_headless(catalog: Option<&Path>, min_flow: f64, output: &Path) -> Result<()> {
    let catalog = match catalog {
        Some(path) => FlowCatalog::from_path(path)
            .with_context(|| format!("failed to load flow catalog {}", path.display()))?,
        None => FlowCatalog::embedded().context("failed to load embedded flow catalog")?,
    };
    let graph = FlowGraph::build(catalog.records(), &ColorPalette::grid(), min_flow);

    GraphExport::new(&catalog, &graph, min_flow).write_to(output)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref())?;

    if !args.min_flow.is_finite() || args.min_flow < 0.0 {
        return Err(anyhow!(
            "--min-flow must be a finite, non-negative number (got {})",
            args.min_flow
        ));
    }

    if let Some(output) = &args.export_graph {
        return export_headless(args.catalog.as_deref(), args.min_flow, output);
    }

    info!(
        catalog = ?args.catalog,
        min_flow = args.min_flow,
        "starting dashboard"
    );

    let launch = app::LaunchOptions {
        catalog_path: args.catalog,
        min_flow: args.min_flow,
        theme: args.theme.into(),
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PLCA Grid Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(app::DashboardApp::new(cc, launch)))),
    )
    .map_err(|err| anyhow!("failed to start the dashboard: {err}"))
}
