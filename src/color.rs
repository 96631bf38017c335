use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: region code → Color32
// ---------------------------------------------------------------------------

/// Maps region codes to distinct colours, shared by the map series and the
/// filter-panel labels so a region reads the same everywhere.
#[derive(Debug, Clone)]
pub struct RegionColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl RegionColors {
    /// Build the colour map from the dataset's sorted region list.
    pub fn new(regions: &[String]) -> Self {
        let palette = generate_palette(regions.len());
        let mapping: BTreeMap<String, Color32> = regions
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        RegionColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a region code.
    pub fn color_for(&self, uf: &str) -> Color32 {
        self.mapping
            .get(uf)
            .copied()
            .unwrap_or(self.default_color)
    }
}
