use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use marine_pollution_dashboard::data::normalize::{MISSING_COLUMN_TYPE, UNKNOWN_LABEL};

/// Neutral colour for categories that carry no information.
const UNKNOWN_COLOR: Color32 = Color32::from_rgb(0x90, 0xa4, 0xae);

/// Headings and accents.
pub const OCEAN_DARK: Color32 = Color32::from_rgb(0x01, 0x57, 0x9b);
pub const OCEAN_MID: Color32 = Color32::from_rgb(0x02, 0x77, 0xbd);

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
            // Start in the blues and walk around the wheel.
            let hue = (200.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// `n` shades of blue from light to dark, for single-series bar charts.
pub fn blues(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            let hsl = Hsl::new(207.0, 0.75, 0.35 + 0.35 * (1.0 - t));
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
// Color mapping: pollution type → Color32
// ---------------------------------------------------------------------------

/// Assigns a stable colour to each pollution type of a dataset.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map from the dataset's pollution types. The `Unknown`
    /// sentinels share a neutral grey.
    pub fn new(pollution_types: &BTreeSet<String>) -> Self {
        let known: Vec<&String> = pollution_types.iter().filter(|t| !is_unknown(t)).collect();
        let palette = generate_palette(known.len());
        let mut mapping: BTreeMap<String, Color32> = known
            .into_iter()
            .zip(palette)
            .map(|(t, c)| (t.clone(), c))
            .collect();
        for t in pollution_types.iter().filter(|t| is_unknown(t)) {
            mapping.insert(t.clone(), UNKNOWN_COLOR);
        }
        ColorMap { mapping }
    }

    pub fn color_for(&self, pollution_type: &str) -> Color32 {
        self.mapping
            .get(pollution_type)
            .copied()
            .unwrap_or(UNKNOWN_COLOR)
    }

    /// Legend entries (label → colour) in label order.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping.iter().map(|(t, c)| (t.clone(), *c)).collect()
    }
}

fn is_unknown(pollution_type: &str) -> bool {
    pollution_type == UNKNOWN_LABEL || pollution_type == MISSING_COLUMN_TYPE
}
