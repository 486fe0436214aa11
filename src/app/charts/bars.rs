use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, pos2, vec2};

use grid_lca_explorer::util::{format_change, format_impact, truncate_label};

use super::super::render_utils::{
    dashed_line, draw_axis_label, grid_stroke, nice_ticks, text_color, weak_text_color,
};

pub(in crate::app) struct BarRow {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

pub(in crate::app) struct StackedColumn {
    pub label: String,
    /// One value per series, in series order.
    pub values: Vec<f64>,
}

pub(in crate::app) struct DivergingRow {
    pub label: String,
    /// Relative changes, one per series.
    pub values: Vec<f64>,
    pub colors: Vec<Color32>,
}

const AXIS_FONT: f32 = 11.0;

pub(in crate::app) fn horizontal_bars(ui: &mut Ui, rows: &[BarRow], height: f32, axis_label: &str) {
    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    if rows.is_empty() {
        return;
    }

    let painter = ui.painter_at(rect);
    let plot = Rect::from_min_max(
        pos2(rect.left() + 110.0, rect.top() + 8.0),
        pos2(rect.right() - 16.0, rect.bottom() - 40.0),
    );
    let max = rows.iter().map(|row| row.value).fold(0.0, f64::max);
    let ticks = nice_ticks(max, 5);
    let axis_max = ticks.last().copied().unwrap_or(1.0).max(f64::EPSILON);
    let x_for = |value: f64| plot.left() + (value / axis_max) as f32 * plot.width();

    for tick in &ticks {
        let x = x_for(*tick);
        painter.line_segment([pos2(x, plot.top()), pos2(x, plot.bottom())], grid_stroke(ui));
        painter.text(
            pos2(x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            format!("{tick}"),
            FontId::proportional(AXIS_FONT),
            weak_text_color(ui),
        );
    }
    draw_axis_label(&painter, rect, axis_label, weak_text_color(ui));

    let band = plot.height() / rows.len() as f32;
    let hover = response.hover_pos();
    let mut hovered = None;

    for (index, row) in rows.iter().enumerate() {
        let center_y = plot.top() + band * (index as f32 + 0.5);
        let bar = Rect::from_min_max(
            pos2(plot.left(), center_y - band * 0.32),
            pos2(x_for(row.value), center_y + band * 0.32),
        );
        painter.rect_filled(bar, 2.0, row.color);
        painter.text(
            pos2(plot.left() - 8.0, center_y),
            Align2::RIGHT_CENTER,
            &row.label,
            FontId::proportional(12.0),
            text_color(ui),
        );

        if hover.is_some_and(|pointer| bar.contains(pointer)) {
            hovered = Some(format!("{}: {}", row.label, format_impact(row.value)));
        }
    }

    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}

pub(in crate::app) fn stacked_columns(
    ui: &mut Ui,
    columns: &[StackedColumn],
    series: &[(String, Color32)],
    height: f32,
    axis_label: &str,
) {
    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    if columns.is_empty() {
        return;
    }

    let painter = ui.painter_at(rect);
    let plot = Rect::from_min_max(
        pos2(rect.left() + 44.0, rect.top() + 8.0),
        pos2(rect.right() - 12.0, rect.bottom() - 44.0),
    );
    let max = columns
        .iter()
        .map(|column| column.values.iter().sum::<f64>())
        .fold(0.0, f64::max);
    let ticks = nice_ticks(max, 5);
    let axis_max = ticks.last().copied().unwrap_or(1.0).max(f64::EPSILON);
    let y_for = |value: f64| plot.bottom() - (value / axis_max) as f32 * plot.height();

    for tick in &ticks {
        let y = y_for(*tick);
        painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid_stroke(ui));
        painter.text(
            pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{tick}"),
            FontId::proportional(AXIS_FONT),
            weak_text_color(ui),
        );
    }
    draw_axis_label(&painter, rect, axis_label, weak_text_color(ui));

    let band = plot.width() / columns.len() as f32;
    let bar_width = band * 0.6;
    let hover = response.hover_pos();
    let mut hovered = None;

    for (index, column) in columns.iter().enumerate() {
        let center_x = plot.left() + band * (index as f32 + 0.5);
        let mut running = 0.0;

        for (value, (series_label, color)) in column.values.iter().zip(series) {
            if *value <= 0.0 {
                continue;
            }
            let segment = Rect::from_min_max(
                pos2(center_x - bar_width * 0.5, y_for(running + value)),
                pos2(center_x + bar_width * 0.5, y_for(running)),
            );
            painter.rect_filled(segment, 0.0, *color);
            running += value;

            if hover.is_some_and(|pointer| segment.contains(pointer)) {
                hovered = Some(format!(
                    "{} in {}: {}",
                    column.label,
                    series_label,
                    format_impact(*value)
                ));
            }
        }

        painter.text(
            pos2(center_x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            truncate_label(&column.label, 12),
            FontId::proportional(AXIS_FONT),
            text_color(ui),
        );
    }

    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}

/// Grouped horizontal bars around a zero line, values as relative changes.
pub(in crate::app) fn diverging_bars(
    ui: &mut Ui,
    rows: &[DivergingRow],
    series: &[String],
    domain: (f64, f64),
    axis_label: &str,
) {
    let row_height = 30.0;
    let height = rows.len() as f32 * row_height + 48.0;
    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    if rows.is_empty() || series.is_empty() {
        return;
    }

    let painter = ui.painter_at(rect);
    let plot = Rect::from_min_max(
        pos2(rect.left() + 190.0, rect.top() + 4.0),
        pos2(rect.right() - 16.0, rect.bottom() - 44.0),
    );
    let (low, high) = domain;
    let x_for = |value: f64| {
        let t = ((value - low) / (high - low)).clamp(0.0, 1.0);
        plot.left() + t as f32 * plot.width()
    };

    let mut tick = (low * 10.0).ceil() / 10.0;
    while tick <= high + 1e-9 {
        let x = x_for(tick);
        painter.line_segment([pos2(x, plot.top()), pos2(x, plot.bottom())], grid_stroke(ui));
        painter.text(
            pos2(x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            format_change(tick),
            FontId::proportional(AXIS_FONT),
            weak_text_color(ui),
        );
        tick += 0.1;
    }

    let zero = x_for(0.0);
    dashed_line(
        &painter,
        pos2(zero, plot.top()),
        pos2(zero, plot.bottom()),
        Stroke::new(1.0, text_color(ui)),
        3.0,
    );
    draw_axis_label(&painter, rect, axis_label, weak_text_color(ui));

    let band = plot.height() / rows.len() as f32;
    let bar_height = (band * 0.8) / series.len() as f32;
    let hover = response.hover_pos();
    let mut hovered = None;

    for (index, row) in rows.iter().enumerate() {
        let top = plot.top() + band * index as f32 + band * 0.1;
        painter.text(
            pos2(plot.left() - 8.0, top + band * 0.4),
            Align2::RIGHT_CENTER,
            &row.label,
            FontId::proportional(12.0),
            text_color(ui),
        );

        for (series_index, (value, color)) in row.values.iter().zip(&row.colors).enumerate() {
            let y = top + bar_height * series_index as f32;
            let x = x_for(*value);
            let bar = Rect::from_two_pos(Pos2::new(zero, y), Pos2::new(x, y + bar_height - 1.0));
            painter.rect_filled(bar, 1.0, *color);

            let hit = bar.expand2(vec2(2.0, 0.0));
            if hover.is_some_and(|pointer| hit.contains(pointer)) {
                hovered = Some(format!(
                    "{} ({}): {}",
                    row.label,
                    series.get(series_index).map(String::as_str).unwrap_or(""),
                    format_change(*value)
                ));
            }
        }
    }

    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}
