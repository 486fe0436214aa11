use eframe::egui::{self, Color32, Sense, Ui, vec2};

mod bars;
mod donut;
mod timeline;

pub(super) use bars::{BarRow, DivergingRow, StackedColumn, diverging_bars, horizontal_bars, stacked_columns};
pub(super) use donut::{DonutSegment, donut};
pub(super) use timeline::{LineSeries, line_chart};

pub(super) fn legend(ui: &mut Ui, entries: &[(String, Color32)]) {
    ui.horizontal_wrapped(|ui| {
        for (label, color) in entries {
            let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, *color);
            ui.label(egui::RichText::new(label).small());
            ui.add_space(8.0);
        }
    });
}
