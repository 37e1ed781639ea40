//! Cluster index → RGB color mapping.
//!
//! Cluster identity is the centroid index reported by the backend, so a
//! palette is a flat list of stops cycled by index. The same index always
//! yields the same color, for labels and centroids alike.

/// An RGB color with components in `[0, 1]`.
pub type Rgb = [f32; 3];

/// The ten-color categorical scheme used for cluster colors.
const CATEGORY10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2,
    0x7f7f7f, 0xbcbd22, 0x17becf,
];

/// Fill used for points before any assignment is shown.
pub const NEUTRAL_HEX: u32 = 0x6c757d;

/// Convert a packed `0xRRGGBB` value to an [`Rgb`] triple.
#[must_use]
pub fn rgb_from_hex(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Format an [`Rgb`] triple as a `#rrggbb` string.
#[must_use]
pub fn rgb_to_hex(rgb: Rgb) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(rgb[0]),
        channel(rgb[1]),
        channel(rgb[2])
    )
}

/// A categorical color palette, cycled by cluster index.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<Rgb>,
}

impl Palette {
    /// Palette over the given stops. An empty list falls back to the default
    /// scheme so [`color`](Self::color) is total.
    #[must_use]
    pub fn new(stops: Vec<Rgb>) -> Self {
        if stops.is_empty() {
            return Self::default();
        }
        Self { stops }
    }

    /// Color for a cluster index. Indices past the end wrap around.
    #[must_use]
    pub fn color(&self, cluster: usize) -> Rgb {
        self.stops[cluster % self.stops.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            stops: default_stops(),
        }
    }
}

/// The default categorical stops as [`Rgb`] triples.
#[must_use]
pub fn default_stops() -> Vec<Rgb> {
    CATEGORY10.iter().map(|&hex| rgb_from_hex(hex)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(rgb_to_hex(rgb_from_hex(0x1f77b4)), "#1f77b4");
        assert_eq!(rgb_to_hex(rgb_from_hex(NEUTRAL_HEX)), "#6c757d");
    }

    #[test]
    fn color_is_stable_per_index_and_wraps() {
        let palette = Palette::default();
        assert_eq!(palette.color(0), rgb_from_hex(0x1f77b4));
        assert_eq!(palette.color(3), palette.color(3));
        assert_eq!(palette.color(10), palette.color(0));
        assert_ne!(palette.color(9), palette.color(0));
        assert_ne!(palette.color(0), palette.color(1));
    }

    #[test]
    fn empty_stops_fall_back_to_default() {
        let palette = Palette::new(Vec::new());
        assert_eq!(palette, Palette::default());
        assert_eq!(palette.color(0), rgb_from_hex(0x1f77b4));
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(rgb_to_hex([1.5, -0.2, 0.0]), "#ff0000");
    }
}
