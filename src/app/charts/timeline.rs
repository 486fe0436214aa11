use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, pos2, vec2};

use grid_lca_explorer::util::format_impact;

use super::super::render_utils::{
    dashed_line, draw_axis_label, grid_stroke, nice_ticks, text_color, weak_text_color,
};

pub(in crate::app) struct LineSeries {
    pub label: String,
    pub color: Color32,
    pub dashed: bool,
    pub points: Vec<(u16, f64)>,
}

pub(in crate::app) fn line_chart(
    ui: &mut Ui,
    series: &[LineSeries],
    y_max: f64,
    height: f32,
    axis_label: &str,
) {
    let (rect, response) =
        ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());

    let years = series
        .iter()
        .flat_map(|line| line.points.iter().map(|(year, _)| *year))
        .collect::<Vec<_>>();
    let (Some(first_year), Some(last_year)) = (years.iter().min(), years.iter().max()) else {
        return;
    };
    let span = (last_year - first_year).max(1) as f32;

    let painter = ui.painter_at(rect);
    let plot = Rect::from_min_max(
        pos2(rect.left() + 44.0, rect.top() + 10.0),
        pos2(rect.right() - 20.0, rect.bottom() - 44.0),
    );
    let ticks = nice_ticks(y_max, 4);
    let axis_max = ticks.last().copied().unwrap_or(1.0).max(f64::EPSILON);
    let to_screen = |year: u16, value: f64| {
        pos2(
            plot.left() + (year - first_year) as f32 / span * plot.width(),
            plot.bottom() - (value / axis_max) as f32 * plot.height(),
        )
    };

    for tick in &ticks {
        let y = to_screen(*first_year, *tick).y;
        dashed_line(
            &painter,
            pos2(plot.left(), y),
            pos2(plot.right(), y),
            grid_stroke(ui),
            3.0,
        );
        painter.text(
            pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{tick}"),
            FontId::proportional(11.0),
            weak_text_color(ui),
        );
    }

    let mut labelled_years = years.clone();
    labelled_years.sort_unstable();
    labelled_years.dedup();
    for year in &labelled_years {
        let x = to_screen(*year, 0.0).x;
        painter.text(
            pos2(x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            year.to_string(),
            FontId::proportional(11.0),
            text_color(ui),
        );
    }
    draw_axis_label(&painter, rect, axis_label, weak_text_color(ui));

    let hover = response.hover_pos();
    let mut nearest: Option<(f32, String)> = None;

    for line in series {
        let points = line
            .points
            .iter()
            .map(|(year, value)| to_screen(*year, *value))
            .collect::<Vec<Pos2>>();
        let stroke = Stroke::new(2.0, line.color);

        for pair in points.windows(2) {
            if line.dashed {
                dashed_line(&painter, pair[0], pair[1], stroke, 5.0);
            } else {
                painter.line_segment([pair[0], pair[1]], stroke);
            }
        }

        for (point, (year, value)) in points.iter().zip(&line.points) {
            painter.circle_filled(*point, 3.5, line.color);

            if let Some(pointer) = hover {
                let distance = point.distance(pointer);
                if distance <= 10.0 && nearest.as_ref().is_none_or(|(best, _)| distance < *best) {
                    nearest = Some((
                        distance,
                        format!("{} ({year}): {}", line.label, format_impact(*value)),
                    ));
                }
            }
        }
    }

    if let Some((_, text)) = nearest {
        response.on_hover_text_at_pointer(text);
    }
}
