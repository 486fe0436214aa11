use eframe::egui::{self, Color32, RichText, Stroke, Ui};

use grid_lca_explorer::dataset::change_color;
use grid_lca_explorer::flow::DEFAULT_NODE_COLOR;
use grid_lca_explorer::util::{IMPACT_UNIT, capitalize, format_change, format_impact};

use super::super::ViewModel;
use super::super::charts::{
    BarRow, DivergingRow, DonutSegment, LineSeries, StackedColumn, diverging_bars, donut,
    horizontal_bars, legend, line_chart, stacked_columns,
};
use super::super::render_utils::{hex_color, with_alpha};

const IMPACT_DOMAIN: (f64, f64) = (-0.35, 0.25);

fn card(ui: &mut Ui, accent: Color32, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style())
        .stroke(Stroke::new(1.0, with_alpha(accent, 0.6)))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_min_width(170.0);
            ui.vertical(add_contents);
        });
}

fn section_heading(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.add_space(4.0);
    ui.heading(title);
    ui.weak(subtitle);
    ui.add_space(8.0);
}

impl ViewModel {
    pub(in crate::app) fn draw_status_quo(&mut self, ui: &mut Ui) {
        let dataset = &self.dataset;
        let total = dataset.status_quo_total();
        section_heading(
            ui,
            &format!("Status quo {}", dataset.status_quo_year),
            "Climate impact of the existing German power grid by component",
        );

        ui.horizontal_wrapped(|ui| {
            let accent = ui.visuals().text_color();
            card(ui, accent, |ui| {
                ui.weak("Total");
                ui.label(RichText::new(format_impact(total)).size(20.0).strong());
            });
            for component in &dataset.status_quo_components {
                let color = hex_color(&component.color);
                card(ui, color, |ui| {
                    ui.weak(component.name.as_str());
                    ui.label(
                        RichText::new(format_impact(component.value))
                            .size(18.0)
                            .color(color),
                    );
                    if total > 0.0 {
                        ui.small(format!("{:.0}% of total", component.value / total * 100.0));
                    }
                });
            }
        });

        ui.add_space(12.0);
        let rows = dataset
            .status_quo_components
            .iter()
            .map(|component| BarRow {
                label: component.name.clone(),
                value: component.value,
                color: hex_color(&component.color),
            })
            .collect::<Vec<_>>();
        horizontal_bars(ui, &rows, 260.0, IMPACT_UNIT);

        ui.add_space(8.0);
        ui.label(format!(
            "The grid accounts for {}.",
            dataset.status_quo_intensity_note
        ));
    }

    pub(in crate::app) fn draw_material_flows(&mut self, ui: &mut Ui) {
        section_heading(
            ui,
            "Material flows",
            "How processes and materials add up to the grid's climate impact",
        );

        self.draw_flow_controls(ui);
        ui.add_space(4.0);
        self.draw_flow_summary(ui);
        ui.add_space(6.0);
        self.draw_flow_diagram(ui);
        ui.add_space(6.0);
        self.draw_flow_legend(ui);

        ui.separator();
        ui.label(RichText::new("Material contribution by component").strong());

        let matrix = &self.material_matrix;
        let series = matrix
            .columns
            .iter()
            .map(|name| (capitalize(name), hex_color(self.palette.color_for(name))))
            .collect::<Vec<_>>();

        let mut order = (0..matrix.rows.len()).collect::<Vec<_>>();
        order.sort_by(|a, b| matrix.row_total(*b).total_cmp(&matrix.row_total(*a)));
        let columns = order
            .into_iter()
            .map(|row| StackedColumn {
                label: capitalize(&matrix.rows[row]),
                values: matrix.values[row].clone(),
            })
            .collect::<Vec<_>>();

        if columns.is_empty() {
            ui.weak("The catalog has no material flows.");
            return;
        }

        ui.weak(format!(
            "Largest single material: {}",
            format_impact(matrix.max_row_total())
        ));
        stacked_columns(ui, &columns, &series, 300.0, IMPACT_UNIT);
        legend(ui, &series);
    }

    pub(in crate::app) fn draw_scenarios(&mut self, ui: &mut Ui) {
        let dataset = &self.dataset;
        section_heading(
            ui,
            "Expansion scenarios",
            "Cumulative climate impact of grid expansion until 2045",
        );

        ui.horizontal_wrapped(|ui| {
            for scenario in &dataset.scenarios {
                let color = hex_color(&scenario.color);
                card(ui, color, |ui| {
                    ui.label(RichText::new(scenario.label.as_str()).color(color).strong());
                    ui.label(RichText::new(format_impact(scenario.cumulative)).size(18.0));
                    match scenario.change {
                        Some(change) => {
                            ui.label(
                                RichText::new(format!("{} vs. static", format_change(change)))
                                    .color(hex_color(change_color(change))),
                            );
                        }
                        None => {
                            ui.weak("Baseline");
                        }
                    }
                });
            }
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Annual climate impact of expansion").strong());
        let series = dataset
            .scenarios
            .iter()
            .map(|scenario| LineSeries {
                label: scenario.label.clone(),
                color: hex_color(&scenario.color),
                dashed: scenario.is_baseline(),
                points: dataset.timeline_series(&scenario.key),
            })
            .collect::<Vec<_>>();
        line_chart(
            ui,
            &series,
            dataset.timeline_max(),
            320.0,
            &format!("Global warming impact ({IMPACT_UNIT})"),
        );
        let entries = series
            .iter()
            .map(|line| (line.label.clone(), line.color))
            .collect::<Vec<_>>();
        legend(ui, &entries);

        if let Some(scenario) = dataset.most_ambitious()
            && let Some(change) = scenario.change
        {
            ui.add_space(6.0);
            ui.label(format!(
                "The {} pathway changes the cumulative expansion impact by {}.",
                scenario.label,
                format_change(change)
            ));
        }
    }

    pub(in crate::app) fn draw_impact_categories(&mut self, ui: &mut Ui) {
        let dataset = &self.dataset;
        section_heading(
            ui,
            "Impact categories",
            "Relative change per impact category compared to the static assessment",
        );

        let compared = dataset.compared_scenarios().collect::<Vec<_>>();
        let series = compared
            .iter()
            .map(|scenario| scenario.label.clone())
            .collect::<Vec<_>>();
        let rows = dataset
            .impact_categories
            .iter()
            .map(|impact| DivergingRow {
                label: impact.category.clone(),
                values: compared
                    .iter()
                    .map(|scenario| impact.change(&scenario.key).unwrap_or(0.0))
                    .collect(),
                colors: compared
                    .iter()
                    .map(|scenario| hex_color(&scenario.color))
                    .collect(),
            })
            .collect::<Vec<_>>();

        let domain = rows
            .iter()
            .flat_map(|row| row.values.iter().copied())
            .fold(IMPACT_DOMAIN, |(low, high), value| {
                (low.min(value), high.max(value))
            });

        let entries = compared
            .iter()
            .map(|scenario| (scenario.label.clone(), hex_color(&scenario.color)))
            .collect::<Vec<_>>();
        legend(ui, &entries);
        diverging_bars(ui, &rows, &series, domain, "Change relative to static assessment");

        let Some(ambitious) = dataset.most_ambitious() else {
            return;
        };
        ui.add_space(10.0);
        ui.label(RichText::new(format!("Highlights for the {}", ambitious.label)).strong());

        let improved = dataset.most_improved(&ambitious.key, 3);
        let trade_offs = dataset.trade_offs(&ambitious.key);
        ui.horizontal_wrapped(|ui| {
            card(ui, hex_color(change_color(-1.0)), |ui| {
                ui.label(RichText::new("Largest improvements").strong());
                for (category, change) in &improved {
                    ui.label(
                        RichText::new(format!("{category}: {}", format_change(*change)))
                            .color(hex_color(change_color(*change))),
                    );
                }
            });
            card(ui, hex_color(change_color(1.0)), |ui| {
                ui.label(RichText::new("Trade-offs").strong());
                if trade_offs.is_empty() {
                    ui.weak("No category gets worse.");
                }
                for (category, change) in &trade_offs {
                    ui.label(
                        RichText::new(format!("{category}: {}", format_change(*change)))
                            .color(hex_color(change_color(*change))),
                    );
                }
            });
        });
    }

    pub(in crate::app) fn draw_electricity_mix(&mut self, ui: &mut Ui) {
        let dataset = &self.dataset;
        section_heading(
            ui,
            "Electricity mix",
            "Carbon footprint of electricity per kWh and the share caused by the grid",
        );

        ui.horizontal_wrapped(|ui| {
            for mix in &dataset.electricity_mix {
                let segments = mix
                    .donut_slices()
                    .into_iter()
                    .map(|slice| DonutSegment {
                        color: hex_color(
                            dataset.generation_color(&slice.name).unwrap_or(DEFAULT_NODE_COLOR),
                        ),
                        label: slice.name,
                        value: slice.value,
                    })
                    .collect::<Vec<_>>();

                ui.vertical(|ui| {
                    ui.set_width(230.0);
                    donut(
                        ui,
                        &segments,
                        &format!("{:.0}", mix.total_g_co2e_per_kwh),
                        "g CO₂-eq/kWh",
                        220.0,
                    );
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(mix.label.as_str()).strong());
                        ui.weak(format!("Grid share {:.1}%", mix.grid_share));
                    });
                });
            }
        });

        let entries = dataset
            .electricity_mix
            .first()
            .map(|mix| {
                mix.donut_slices()
                    .into_iter()
                    .map(|slice| {
                        let color = dataset
                            .generation_color(&slice.name)
                            .unwrap_or(DEFAULT_NODE_COLOR);
                        (slice.name, hex_color(color))
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        legend(ui, &entries);

        if let Some((first, last)) = dataset.grid_share_shift() {
            ui.add_space(10.0);
            let accent = ui.visuals().warn_fg_color;
            card(ui, accent, |ui| {
                ui.label(
                    RichText::new(format!("{first:.0}% → {last:.0}%"))
                        .size(20.0)
                        .strong(),
                );
                ui.label(
                    "As generation decarbonises, the grid's share of the electricity \
                     footprint grows.",
                );
            });
        }
    }

    pub(in crate::app) fn draw_key_findings(&mut self, ui: &mut Ui) {
        section_heading(ui, "Key findings", self.dataset.source.as_str());

        let accent = ui.visuals().selection.bg_fill;
        for (index, finding) in self.dataset.key_findings.iter().enumerate() {
            card(ui, accent, |ui| {
                ui.label(
                    RichText::new(format!("{}. {}", index + 1, finding.title))
                        .size(16.0)
                        .strong(),
                );
                ui.label(finding.description.as_str());
            });
            ui.add_space(6.0);
        }
    }
}
