use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Chart", inline)]
#[serde(default)]
/// Canvas size and the margins around the plotting area, in pixels.
pub struct ChartOptions {
    /// Total canvas width.
    #[schemars(title = "Width", range(min = 100.0, max = 4096.0))]
    pub width: f64,
    /// Total canvas height.
    #[schemars(title = "Height", range(min = 100.0, max = 4096.0))]
    pub height: f64,
    /// Space above the plot.
    pub margin_top: f64,
    /// Space right of the plot.
    pub margin_right: f64,
    /// Space below the plot.
    pub margin_bottom: f64,
    /// Space left of the plot.
    pub margin_left: f64,
}

impl ChartOptions {
    /// Plot area `(width, height)` once margins are removed. Never negative.
    #[must_use]
    pub fn inner_size(&self) -> (f64, f64) {
        (
            (self.width - self.margin_left - self.margin_right).max(0.0),
            (self.height - self.margin_top - self.margin_bottom).max(0.0),
        )
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 20.0,
            margin_left: 40.0,
        }
    }
}
