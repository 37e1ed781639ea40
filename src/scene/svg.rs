//! SVG serialization of a sampled [`SceneFrame`].
//!
//! Produces a standalone document the size of the canvas, with the plot
//! translated by the chart margins. Points are circles; centroids are star
//! paths translated to their centers.

use std::fmt::Write;

use super::glyph;
use super::SceneFrame;
use crate::options::ChartOptions;
use crate::util::palette::rgb_to_hex;

/// Render `frame` as an SVG document.
#[must_use]
pub fn render(frame: &SceneFrame, chart: &ChartOptions) -> String {
    let mut out = String::with_capacity(128 + frame.points.len() * 96);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = chart.width,
        h = chart.height,
    );
    let _ = writeln!(
        out,
        r#"<g transform="translate({}, {})">"#,
        chart.margin_left, chart.margin_top
    );

    for point in &frame.points {
        let _ = writeln!(
            out,
            r#"<circle class="data-point" cx="{:.2}" cy="{:.2}" r="{}" fill="{}" opacity="{:.3}"/>"#,
            point.center.x,
            point.center.y,
            point.radius,
            rgb_to_hex(point.fill),
            point.opacity,
        );
    }

    for centroid in &frame.centroids {
        let _ = writeln!(
            out,
            r#"<path class="centroid" data-cluster="{}" d="{}" transform="translate({:.2}, {:.2})" fill="{}" opacity="{:.3}"/>"#,
            centroid.cluster,
            path_data(&glyph::star(centroid.size)),
            centroid.center.x,
            centroid.center.y,
            rgb_to_hex(centroid.fill),
            centroid.opacity,
        );
    }

    out.push_str("</g>\n</svg>\n");
    out
}

/// `M x,y L x,y ... Z` for a closed outline.
fn path_data(outline: &[glam::Vec2]) -> String {
    let mut d = String::with_capacity(outline.len() * 16);
    for (i, p) in outline.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{:.3},{:.3}", p.x, p.y);
    }
    d.push('Z');
    d
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::super::{CentroidPrimitive, PointPrimitive};
    use super::*;

    fn frame() -> SceneFrame {
        SceneFrame {
            points: vec![
                PointPrimitive {
                    center: Vec2::new(10.0, 20.0),
                    radius: 5.0,
                    fill: [0.0, 0.0, 0.0],
                    opacity: 0.8,
                },
                PointPrimitive {
                    center: Vec2::new(30.5, 40.25),
                    radius: 5.0,
                    fill: [1.0, 1.0, 1.0],
                    opacity: 0.8,
                },
            ],
            centroids: vec![CentroidPrimitive {
                cluster: 3,
                center: Vec2::new(100.0, 50.0),
                size: 200.0,
                fill: [1.0, 0.0, 0.0],
                opacity: 1.0,
            }],
        }
    }

    #[test]
    fn document_has_one_element_per_primitive() {
        let svg = render(&frame(), &ChartOptions::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("class=\"centroid\"").count(), 1);
        assert!(svg.contains(r#"translate(40, 20)"#));
    }

    #[test]
    fn attributes_are_serialized() {
        let svg = render(&frame(), &ChartOptions::default());
        assert!(svg.contains(r#"cx="30.50" cy="40.25""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains(r#"data-cluster="3""#));
        assert!(svg.contains(r#"translate(100.00, 50.00)"#));
    }

    #[test]
    fn star_path_is_closed() {
        let d = path_data(&glyph::star(200.0));
        assert!(d.starts_with('M'));
        assert!(d.ends_with('Z'));
        assert_eq!(d.matches('L').count(), 9);
    }

    #[test]
    fn empty_frame_is_valid_document() {
        let svg = render(&SceneFrame::default(), &ChartOptions::default());
        assert!(!svg.contains("<circle"));
        assert!(svg.contains("</g>"));
    }
}
