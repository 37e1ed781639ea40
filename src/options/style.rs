use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::palette::{self, Palette, Rgb};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Style", inline)]
#[serde(default)]
/// Marker appearance.
pub struct StyleOptions {
    /// Point marker radius in pixels.
    #[schemars(title = "Point Radius", range(min = 1.0, max = 20.0))]
    pub point_radius: f32,
    /// Point opacity.
    #[schemars(title = "Point Opacity", range(min = 0.0, max = 1.0))]
    pub point_opacity: f32,
    /// Fill of points before any assignment is shown.
    #[schemars(skip)]
    pub neutral_fill: Rgb,
    /// Centroid star area in square pixels.
    #[schemars(title = "Centroid Size", range(min = 10.0, max = 2000.0))]
    pub centroid_size: f32,
    /// Cluster colors, cycled by cluster index.
    #[schemars(skip)]
    pub palette: Vec<Rgb>,
}

impl StyleOptions {
    /// The cluster palette built from [`palette`](Self::palette).
    #[must_use]
    pub fn cluster_palette(&self) -> Palette {
        Palette::new(self.palette.clone())
    }
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            point_radius: 5.0,
            point_opacity: 0.8,
            neutral_fill: palette::rgb_from_hex(palette::NEUTRAL_HEX),
            centroid_size: 200.0,
            palette: palette::default_stops(),
        }
    }
}
