use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context, Rect, ThemePreference};
use tracing::{error, info};

use grid_lca_explorer::dataset::Dataset;
use grid_lca_explorer::flow::{ColorPalette, ContributionMatrix, FlowCatalog, FlowGraph};
use grid_lca_explorer::layout::SankeyLayout;

mod charts;
mod flow;
mod render_utils;
mod ui;

pub struct LaunchOptions {
    pub catalog_path: Option<PathBuf>,
    pub min_flow: f64,
    pub theme: ThemePreference,
}

pub struct DashboardApp {
    options: LaunchOptions,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoadedData {
    catalog: FlowCatalog,
    dataset: Dataset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    StatusQuo,
    MaterialFlows,
    Scenarios,
    ImpactCategories,
    ElectricityMix,
    KeyFindings,
}

impl Tab {
    const ALL: [Self; 6] = [
        Self::StatusQuo,
        Self::MaterialFlows,
        Self::Scenarios,
        Self::ImpactCategories,
        Self::ElectricityMix,
        Self::KeyFindings,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::StatusQuo => "1 Status quo",
            Self::MaterialFlows => "2 Material flows",
            Self::Scenarios => "3 Expansion scenarios",
            Self::ImpactCategories => "4 Impact categories",
            Self::ElectricityMix => "5 Electricity mix",
            Self::KeyFindings => "6 Key findings",
        }
    }
}

struct ViewModel {
    catalog: FlowCatalog,
    dataset: Dataset,
    palette: ColorPalette,
    /// Material by component totals over the whole catalog.
    material_matrix: ContributionMatrix,
    catalog_label: String,
    tab: Tab,
    theme: ThemePreference,
    min_flow: f64,
    search: String,
    show_link_values: bool,
    show_about: bool,
    export_path: String,
    status_message: Option<String>,
    flow_cache: Option<FlowCache>,
    search_match_cache: Option<SearchMatchCache>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FlowCacheKey {
    catalog_revision: u64,
    min_flow_bits: u64,
}

/// Graph built for one catalog revision and threshold, plus its latest layout.
struct FlowCache {
    key: FlowCacheKey,
    graph: FlowGraph,
    layout: Option<CachedLayout>,
}

struct CachedLayout {
    bounds: Rect,
    layout: SankeyLayout,
}

struct SearchMatchCache {
    query: String,
    catalog_revision: u64,
    matches: Arc<HashSet<usize>>,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        cc.egui_ctx.set_theme(options.theme);
        let state = Self::start_load(options.catalog_path.clone());
        Self { options, state }
    }

    fn spawn_load(catalog_path: Option<PathBuf>) -> Receiver<Result<LoadedData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_data(catalog_path.as_deref()).map_err(|error| {
                error!("failed to load dashboard data: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(catalog_path: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(catalog_path),
        }
    }
}

fn load_data(catalog_path: Option<&std::path::Path>) -> Result<LoadedData> {
    let catalog = match catalog_path {
        Some(path) => FlowCatalog::from_path(path)
            .with_context(|| format!("failed to load flow catalog {}", path.display()))?,
        None => FlowCatalog::embedded().context("failed to load embedded flow catalog")?,
    };
    let dataset = Dataset::embedded()?;

    info!(
        records = catalog.len(),
        revision = %format!("{:016x}", catalog.revision()),
        "dashboard data loaded"
    );
    Ok(LoadedData { catalog, dataset })
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(data) => AppState::Ready(Box::new(ViewModel::new(
                                data,
                                &self.options,
                            ))),
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading grid assessment data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the flow catalog");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.options.catalog_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
