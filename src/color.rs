use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize, saturation: f32, lightness: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, saturation, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the values of a categorical column to distinct colours.
///
/// Built from the full domain so a category keeps its colour however the
/// filters change.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Bold colours for brands.
    pub fn bold(categories: &BTreeSet<String>) -> Self {
        Self::with_palette(categories, generate_palette(categories.len(), 0.75, 0.45))
    }

    /// Soft colours for the pie chart.
    pub fn pastel(categories: &BTreeSet<String>) -> Self {
        Self::with_palette(categories, generate_palette(categories.len(), 0.6, 0.75))
    }

    fn with_palette(categories: &BTreeSet<String>, palette: Vec<Color32>) -> Self {
        let mapping = categories.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping.get(category).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0, 0.75, 0.45).is_empty());
        assert_eq!(generate_palette(7, 0.75, 0.45).len(), 7);
    }

    #[test]
    fn categories_get_distinct_colours_and_unknowns_are_grey() {
        let brands: BTreeSet<String> = ["Bajaj", "Honda", "Yamaha"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = ColorMap::bold(&brands);

        assert_ne!(map.color_for("Bajaj"), map.color_for("Honda"));
        assert_ne!(map.color_for("Honda"), map.color_for("Yamaha"));
        assert_eq!(map.color_for("Vespa"), Color32::GRAY);
    }
}
