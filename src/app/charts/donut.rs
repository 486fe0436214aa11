use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, FontId, Mesh, Pos2, Sense, Shape, Stroke, Ui, pos2, vec2};

use super::super::render_utils::{text_color, weak_text_color};

pub(in crate::app) struct DonutSegment {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

const PADDING_ANGLE: f32 = 0.035;

fn arc_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + vec2(angle.cos(), angle.sin()) * radius
}

/// Ring chart with a headline and caption in the hole.
pub(in crate::app) fn donut(
    ui: &mut Ui,
    segments: &[DonutSegment],
    headline: &str,
    caption: &str,
    size: f32,
) {
    let (rect, response) = ui.allocate_exact_size(vec2(size, size), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let outer = size * 0.46;
    let inner = outer * 0.62;

    let total = segments.iter().map(|segment| segment.value.max(0.0)).sum::<f64>();
    let hover = response.hover_pos();
    let mut hovered = None;

    if total > 0.0 {
        let mut start = -FRAC_PI_2;
        for segment in segments {
            let sweep = (segment.value.max(0.0) / total) as f32 * TAU;
            if sweep <= 0.0 {
                continue;
            }

            let padded_start = start + PADDING_ANGLE * 0.5;
            let padded_end = (start + sweep - PADDING_ANGLE * 0.5).max(padded_start);
            let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as u32;

            let mut mesh = Mesh::default();
            for step in 0..=steps {
                let angle = padded_start + (padded_end - padded_start) * step as f32 / steps as f32;
                mesh.colored_vertex(arc_point(center, outer, angle), segment.color);
                mesh.colored_vertex(arc_point(center, inner, angle), segment.color);
            }
            for step in 0..steps {
                let base = step * 2;
                mesh.add_triangle(base, base + 1, base + 2);
                mesh.add_triangle(base + 1, base + 3, base + 2);
            }
            painter.add(Shape::mesh(mesh));

            if let Some(pointer) = hover {
                let offset = pointer - center;
                let distance = offset.length();
                let angle = (offset.y.atan2(offset.x) + FRAC_PI_2).rem_euclid(TAU) - FRAC_PI_2;
                if distance >= inner && distance <= outer && angle >= start && angle < start + sweep {
                    hovered = Some(format!("{}: {:.1}%", segment.label, segment.value));
                }
            }

            start += sweep;
        }
    } else {
        painter.circle_stroke(center, (outer + inner) * 0.5, Stroke::new(outer - inner, weak_text_color(ui)));
    }

    painter.text(
        center - vec2(0.0, 8.0),
        Align2::CENTER_CENTER,
        headline,
        FontId::proportional(20.0),
        text_color(ui),
    );
    painter.text(
        pos2(center.x, center.y + 12.0),
        Align2::CENTER_CENTER,
        caption,
        FontId::proportional(11.0),
        weak_text_color(ui),
    );

    if let Some(text) = hovered {
        response.on_hover_text_at_pointer(text);
    }
}
