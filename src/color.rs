use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<[u8; 3]> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: band name → RGB
// ---------------------------------------------------------------------------

/// Maps band names to distinct, stable colours.
///
/// Colours are assigned in the order the names are given (sensor-channel
/// order), so a band keeps its colour wherever it is drawn.
#[derive(Debug, Clone)]
pub struct BandColors {
    mapping: BTreeMap<String, [u8; 3]>,
    default_color: [u8; 3],
}

impl BandColors {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let palette = generate_palette(names.len());
        let mapping: BTreeMap<String, [u8; 3]> = names
            .into_iter()
            .zip(palette)
            .map(|(name, rgb)| (name.to_string(), rgb))
            .collect();

        BandColors {
            mapping,
            default_color: [128, 128, 128],
        }
    }

    /// Look up the colour for a band, falling back to gray.
    pub fn rgb_for(&self, band: &str) -> [u8; 3] {
        self.mapping.get(band).copied().unwrap_or(self.default_color)
    }
}
