//! Data-space → pixel-space mapping.
//!
//! Two independent linear scales, fitted once per dataset. The vertical
//! range is inverted so data Y grows upward on screen.

use glam::Vec2;

use crate::model::{Dataset, Sample};
use crate::options::ChartOptions;

/// Padding added to both ends of each axis domain, in data units.
pub const DOMAIN_PADDING: f64 = 1.0;

/// A linear map from a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Scale from `domain` onto `range`. Either interval may be reversed.
    #[must_use]
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// The data interval.
    #[must_use]
    pub const fn domain(&self) -> [f64; 2] {
        self.domain
    }

    /// Map a data value to pixels. A zero-width domain maps everything to
    /// the start of the range.
    ///
    /// Differences are taken on halved operands so domains spanning most of
    /// the `f64` range stay finite.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1.mul_add(0.5, -(d0 * 0.5));
        if span == 0.0 {
            return r0;
        }
        let offset = value.mul_add(0.5, -(d0 * 0.5));
        (offset / span).mul_add(r1 - r0, r0)
    }
}

/// Padded `[min, max]` of one axis, `[-pad, pad]` when there are no values.
fn padded_extent(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let extent = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });
    let (lo, hi) = extent.unwrap_or((0.0, 0.0));
    [lo - DOMAIN_PADDING, hi + DOMAIN_PADDING]
}

/// Holds the horizontal and vertical scales for the current dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryMapper {
    x: LinearScale,
    y: LinearScale,
    chart_width: f64,
    chart_height: f64,
}

impl GeometryMapper {
    /// Mapper for a chart area with unit domains. Call [`fit`](Self::fit)
    /// before projecting real data.
    #[must_use]
    pub fn new(chart: &ChartOptions) -> Self {
        let (w, h) = chart.inner_size();
        Self {
            x: LinearScale::new([-1.0, 1.0], [0.0, w]),
            y: LinearScale::new([-1.0, 1.0], [h, 0.0]),
            chart_width: w,
            chart_height: h,
        }
    }

    /// Refit both domains to the dataset's padded extents.
    pub fn fit(&mut self, dataset: &Dataset) {
        let samples = dataset.samples();
        let x_domain = padded_extent(samples.iter().map(|s| s.x));
        let y_domain = padded_extent(samples.iter().map(|s| s.y));
        self.x = LinearScale::new(x_domain, [0.0, self.chart_width]);
        self.y = LinearScale::new(y_domain, [self.chart_height, 0.0]);
        log::debug!(
            "fitted scales: x {x_domain:?} → [0, {}], y {y_domain:?} → [{}, 0]",
            self.chart_width,
            self.chart_height
        );
    }

    /// The horizontal scale.
    #[must_use]
    pub const fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    /// The vertical scale.
    #[must_use]
    pub const fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    /// Pixel position of a data coordinate, relative to the chart origin.
    #[must_use]
    pub fn project(&self, sample: Sample) -> Vec2 {
        Vec2::new(self.x.map(sample.x) as f32, self.y.map(sample.y) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> ChartOptions {
        ChartOptions {
            width: 440.0,
            height: 240.0,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
        }
    }

    fn dataset(points: &[[f64; 2]]) -> Dataset {
        Dataset::new(points.iter().copied().map(Sample::from).collect())
            .unwrap()
    }

    #[test]
    fn square_dataset_pads_domain_by_one() {
        let mut mapper = GeometryMapper::new(&chart());
        mapper.fit(&dataset(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]]));
        assert_eq!(mapper.x_scale().domain(), [-1.0, 3.0]);
        assert_eq!(mapper.y_scale().domain(), [-1.0, 3.0]);
    }

    #[test]
    fn unfitted_mapper_spans_chart_area_with_inverted_y() {
        let mapper = GeometryMapper::new(&chart());
        assert_eq!(mapper.project(Sample::new(-1.0, -1.0)), Vec2::new(0.0, 200.0));
        assert_eq!(mapper.project(Sample::new(1.0, 1.0)), Vec2::new(400.0, 0.0));
    }

    #[test]
    fn projection_maps_corners() {
        let mut mapper = GeometryMapper::new(&chart());
        mapper.fit(&dataset(&[[0.0, 0.0], [2.0, 2.0]]));
        // Domain [-1, 3] on both axes.
        assert_eq!(mapper.project(Sample::new(-1.0, -1.0)), Vec2::new(0.0, 200.0));
        assert_eq!(mapper.project(Sample::new(3.0, 3.0)), Vec2::new(400.0, 0.0));
        assert_eq!(mapper.project(Sample::new(1.0, 1.0)), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn degenerate_axis_still_has_width() {
        let mut mapper = GeometryMapper::new(&chart());
        mapper.fit(&dataset(&[[5.0, 1.0], [5.0, 4.0]]));
        assert_eq!(mapper.x_scale().domain(), [4.0, 6.0]);
        let p = mapper.project(Sample::new(5.0, 1.0));
        assert!(p.x.is_finite());
        assert_eq!(p.x, 200.0);
    }

    #[test]
    fn single_point_dataset_is_centered() {
        let mut mapper = GeometryMapper::new(&chart());
        mapper.fit(&dataset(&[[-3.0, 7.0]]));
        assert_eq!(mapper.project(Sample::new(-3.0, 7.0)), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn empty_dataset_uses_unit_domain() {
        let mut mapper = GeometryMapper::new(&chart());
        mapper.fit(&Dataset::default());
        assert_eq!(mapper.x_scale().domain(), [-1.0, 1.0]);
        assert_eq!(mapper.y_scale().domain(), [-1.0, 1.0]);
    }

    #[test]
    fn extreme_coordinates_project_to_finite_pixels() {
        let mut mapper = GeometryMapper::new(&chart());
        mapper.fit(&dataset(&[[-1e308, 0.0], [1e308, 0.0]]));

        let right = mapper.project(Sample::new(1e308, 0.0));
        let left = mapper.project(Sample::new(-1e308, 0.0));
        assert!(right.is_finite() && left.is_finite());
        assert!((right.x - 400.0).abs() < 1e-3, "right edge at {}", right.x);
        assert!(left.x.abs() < 1e-3, "left edge at {}", left.x);
        assert_eq!(right.y, 100.0);
    }

    #[test]
    fn extreme_scale_maps_midpoint_to_center() {
        let scale = LinearScale::new([-f64::MAX, f64::MAX], [0.0, 100.0]);
        assert_eq!(scale.map(0.0), 50.0);
        assert_eq!(scale.map(f64::MAX), 100.0);
    }

    #[test]
    fn zero_width_scale_maps_to_range_start() {
        let scale = LinearScale::new([2.0, 2.0], [10.0, 20.0]);
        assert_eq!(scale.map(2.0), 10.0);
    }
}
