use std::collections::{BTreeMap, BTreeSet};

use image::Rgb;
use palette::{Hsl, IntoColor, Srgb};

/// Default series colour (the conventional "tab:blue").
pub const SERIES_BLUE: Rgb<u8> = Rgb([31, 119, 180]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const GRID_GRAY: Rgb<u8> = Rgb([220, 220, 220]);
pub const MARKER_RED: Rgb<u8> = Rgb([214, 39, 40]);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: cluster label → colour
// ---------------------------------------------------------------------------

/// Maps the distinct cluster labels of a plot to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<usize, Rgb<u8>>,
    default_color: Rgb<u8>,
}

impl ColorMap {
    pub fn new(labels: &BTreeSet<usize>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().copied().zip(palette).collect();
        ColorMap {
            mapping,
            default_color: GRID_GRAY,
        }
    }

    pub fn color_for(&self, label: usize) -> Rgb<u8> {
        self.mapping
            .get(&label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(6);
        assert_eq!(colours.len(), 6);
        let unique: BTreeSet<[u8; 3]> = colours.iter().map(|c| c.0).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_label_gets_default() {
        let labels: BTreeSet<usize> = [0, 2].into_iter().collect();
        let map = ColorMap::new(&labels);
        assert_ne!(map.color_for(0), map.color_for(2));
        assert_eq!(map.color_for(7), GRID_GRAY);
    }
}
