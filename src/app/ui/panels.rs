use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, RichText, ThemePreference};
use tracing::{error, info};

use grid_lca_explorer::export::GraphExport;
use grid_lca_explorer::flow::{ColorPalette, ContributionMatrix, NodeCategory};

use super::super::{LaunchOptions, LoadedData, Tab, ViewModel};

const DEFAULT_EXPORT_PATH: &str = "flow-graph.json";

const THEMES: [(ThemePreference, &str); 3] = [
    (ThemePreference::Light, "Light"),
    (ThemePreference::Dark, "Dark"),
    (ThemePreference::System, "System"),
];

impl ViewModel {
    pub(in crate::app) fn new(data: LoadedData, options: &LaunchOptions) -> Self {
        let catalog_label = match &options.catalog_path {
            Some(path) => path.display().to_string(),
            None => "embedded catalog".to_owned(),
        };

        let material_matrix = ContributionMatrix::from_records(
            data.catalog.records(),
            NodeCategory::Material,
            NodeCategory::Component,
        );

        Self {
            material_matrix,
            catalog: data.catalog,
            dataset: data.dataset,
            palette: ColorPalette::grid(),
            catalog_label,
            tab: Tab::StatusQuo,
            theme: options.theme,
            min_flow: options.min_flow,
            search: String::new(),
            show_link_values: false,
            show_about: false,
            export_path: DEFAULT_EXPORT_PATH.to_owned(),
            status_message: None,
            flow_cache: None,
            search_match_cache: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(self.dataset.title.as_str());
                    ui.separator();
                    ui.label(format!("catalog: {}", self.catalog_label));
                    ui.label(format!("records: {}", self.catalog.len()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("About").clicked() {
                            self.show_about = true;
                        }
                        ui.separator();
                        self.draw_theme_selector(ui, ctx);
                    });
                });

                ui.horizontal_wrapped(|ui| {
                    for tab in Tab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.label());
                    }
                });
            });

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.tab {
                    Tab::StatusQuo => self.draw_status_quo(ui),
                    Tab::MaterialFlows => self.draw_material_flows(ui),
                    Tab::Scenarios => self.draw_scenarios(ui),
                    Tab::ImpactCategories => self.draw_impact_categories(ui),
                    Tab::ElectricityMix => self.draw_electricity_mix(ui),
                    Tab::KeyFindings => self.draw_key_findings(ui),
                });
        });

        self.draw_about_window(ctx);
    }

    fn draw_theme_selector(&mut self, ui: &mut egui::Ui, ctx: &Context) {
        let previous = self.theme;
        // Right-to-left layout, so the last entry renders first.
        for (theme, label) in THEMES.iter().rev() {
            ui.selectable_value(&mut self.theme, *theme, *label);
        }
        ui.label("Theme:");

        if self.theme != previous {
            ctx.set_theme(self.theme);
        }
    }

    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Export flow graph to");
            ui.add(egui::TextEdit::singleline(&mut self.export_path).desired_width(220.0));
            let can_export = !self.export_path.trim().is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export JSON"))
                .clicked()
            {
                self.export_graph();
            }

            if let Some(message) = &self.status_message {
                ui.separator();
                ui.label(message.as_str());
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.weak(self.dataset.source.as_str());
            });
        });
    }

    fn export_graph(&mut self) {
        let path = self.export_path.trim().to_owned();
        // Make sure the cache holds the graph for the current threshold.
        self.flow_graph();
        let Some(cache) = &self.flow_cache else {
            return;
        };

        let export = GraphExport::new(&self.catalog, &cache.graph, self.min_flow);
        self.status_message = Some(match export.write_to(Path::new(&path)) {
            Ok(()) => {
                info!(path = %path, "flow graph exported from dashboard");
                format!("Exported {} flows to {path}", cache.graph.links.len())
            }
            Err(err) => {
                error!("flow graph export failed: {err:#}");
                format!("Export failed: {err:#}")
            }
        });
    }

    fn draw_about_window(&mut self, ctx: &Context) {
        let mut open = self.show_about;
        egui::Window::new("About")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(RichText::new(self.dataset.title.as_str()).strong());
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(6.0);
                ui.label(
                    "Prospective life cycle assessment of the German power grid: \
                     component impacts, material flows, and expansion scenarios to 2045.",
                );
                ui.add_space(6.0);
                ui.weak(format!("Data: {}", self.dataset.source));
                ui.weak(format!(
                    "Flow catalog revision {:016x}",
                    self.catalog.revision()
                ));
            });
        self.show_about = open;
    }
}
