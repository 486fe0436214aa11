pub const IMPACT_UNIT: &str = "Mt CO₂-eq";

pub fn format_impact(value: f64) -> String {
    format!("{value:.2} {IMPACT_UNIT}")
}

/// Relative change as a signed whole percentage, e.g. `-23%` or `+18%`.
pub fn format_change(change: f64) -> String {
    let percent = (change * 100.0).round();
    if percent > 0.0 {
        format!("+{percent:.0}%")
    } else if percent < 0.0 {
        format!("{percent:.0}%")
    } else {
        "0%".to_owned()
    }
}

/// Shortens `label` to `max_chars` characters followed by `...`.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let mut short = label.chars().take(max_chars).collect::<String>();
    short.push_str("...");
    short
}

pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_has_two_decimals() {
        assert_eq!(format_impact(64.758782), "64.76 Mt CO₂-eq");
    }

    #[test]
    fn change_is_signed() {
        assert_eq!(format_change(-0.23), "-23%");
        assert_eq!(format_change(0.18), "+18%");
        assert_eq!(format_change(0.001), "0%");
        assert_eq!(format_change(-0.004), "0%");
    }

    #[test]
    fn long_labels_are_cut_at_char_boundaries() {
        assert_eq!(truncate_label("overhead lines", 12), "overhead lin...");
        assert_eq!(truncate_label("cables", 12), "cables");
        assert_eq!(truncate_label("CO₂-CO₂-CO₂-CO₂", 5), "CO₂-C...");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("iron & steel"), "Iron & steel");
        assert_eq!(capitalize(""), "");
    }
}
