use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Ui};

use grid_lca_explorer::flow::DEFAULT_NODE_COLOR;

/// Parses `#rrggbb`; anything else renders in the neutral node color.
pub(super) fn hex_color(value: &str) -> Color32 {
    parse_hex(value)
        .or_else(|| parse_hex(DEFAULT_NODE_COLOR))
        .unwrap_or(Color32::GRAY)
}

fn parse_hex(value: &str) -> Option<Color32> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn grid_stroke(ui: &Ui) -> Stroke {
    Stroke::new(1.0, with_alpha(ui.visuals().weak_text_color(), 0.25))
}

pub(super) fn text_color(ui: &Ui) -> Color32 {
    ui.visuals().text_color()
}

pub(super) fn weak_text_color(ui: &Ui) -> Color32 {
    ui.visuals().weak_text_color()
}

/// Dashed line from `start` to `end`.
pub(super) fn dashed_line(painter: &Painter, start: Pos2, end: Pos2, stroke: Stroke, dash: f32) {
    let delta = end - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }

    let direction = delta / length;
    let mut offset = 0.0;
    while offset < length {
        let segment_end = (offset + dash).min(length);
        painter.line_segment(
            [start + direction * offset, start + direction * segment_end],
            stroke,
        );
        offset += dash * 2.0;
    }
}

/// Evenly spaced tick values covering `0..=max`.
pub(super) fn nice_ticks(max: f64, count: usize) -> Vec<f64> {
    if max <= 0.0 || count == 0 {
        return vec![0.0];
    }

    let raw_step = max / count as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|factor| factor * magnitude)
        .find(|step| *step >= raw_step)
        .unwrap_or(raw_step);

    let mut ticks = Vec::new();
    let mut value = 0.0;
    while value <= max + step * 0.5 {
        ticks.push(value);
        value += step;
    }
    ticks
}

pub(super) fn draw_axis_label(painter: &Painter, rect: Rect, text: &str, color: Color32) {
    painter.text(
        rect.center_bottom(),
        Align2::CENTER_BOTTOM,
        text,
        FontId::proportional(11.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_and_fall_back() {
        assert_eq!(hex_color("#2563eb"), Color32::from_rgb(0x25, 0x63, 0xeb));
        assert_eq!(hex_color("2563eb"), Color32::from_rgb(0x9c, 0xa3, 0xaf));
        assert_eq!(hex_color("#xyz123"), Color32::from_rgb(0x9c, 0xa3, 0xaf));
    }

    #[test]
    fn ticks_cover_the_maximum() {
        assert_eq!(nice_ticks(7.88, 4), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(nice_ticks(0.0, 4), vec![0.0]);
    }
}
