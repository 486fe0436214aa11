use std::collections::HashMap;

/// Neutral gray used for any node the palette does not know.
pub const DEFAULT_NODE_COLOR: &str = "#9ca3af";

const GRID_NODE_COLORS: [(&str, &str); 21] = [
    ("grid status quo", "#17becf"),
    ("cables", "#f97316"),
    ("overhead lines", "#2563eb"),
    ("transformers", "#22c55e"),
    ("substations", "#ef4444"),
    ("switchgears", "#a855f7"),
    ("aluminum", "#60a5fa"),
    ("copper", "#f87171"),
    ("iron & steel", "#4ade80"),
    ("plastics", "#c084fc"),
    ("concrete", "#9ca3af"),
    ("SF6", "#fbbf24"),
    ("other materials", "#a3e635"),
    ("electricity", "#64748b"),
    ("heat", "#fcd34d"),
    ("transport", "#22d3ee"),
    ("coal", "#1e293b"),
    ("clinker", "#65a30d"),
    ("aluminum (process emissions)", "#d97706"),
    ("iron & steel (process emissions)", "#dc2626"),
    ("other processes", "#a855f7"),
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorPalette {
    colors: HashMap<String, String>,
}

impl ColorPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors for the processes, materials and components of the grid catalog.
    pub fn grid() -> Self {
        GRID_NODE_COLORS
            .iter()
            .map(|(name, color)| (name.to_string(), color.to_string()))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(name.into(), color.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    pub fn color_for(&self, name: &str) -> &str {
        self.get(name).unwrap_or(DEFAULT_NODE_COLOR)
    }
}

impl FromIterator<(String, String)> for ColorPalette {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_neutral_gray() {
        let palette = ColorPalette::grid();
        assert_eq!(palette.color_for("overhead lines"), "#2563eb");
        assert_eq!(palette.color_for("hydrogen storage"), DEFAULT_NODE_COLOR);
        assert_eq!(ColorPalette::new().color_for(""), DEFAULT_NODE_COLOR);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let palette = ColorPalette::grid();
        assert_eq!(palette.get("SF6"), Some("#fbbf24"));
        assert_eq!(palette.get("sf6"), None);
    }
}
