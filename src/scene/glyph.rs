//! Marker glyph outlines.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Ratio between a star's area and the square of its outer radius.
const STAR_AREA_RATIO: f32 = 0.890_813_1;

/// Closed outline of a five-pointed star centred on the origin, pointing
/// up, whose area is approximately `size` square pixels.
///
/// Ten vertices alternate between outer tips and inner notches, starting at
/// the top tip.
#[must_use]
pub fn star(size: f32) -> Vec<Vec2> {
    let inner_ratio = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
    let r = (size.max(0.0) * STAR_AREA_RATIO).sqrt();
    let notch = Vec2::new(
        (TAU / 10.0).sin() * inner_ratio * r,
        -(TAU / 10.0).cos() * inner_ratio * r,
    );

    let mut outline = Vec::with_capacity(10);
    outline.push(Vec2::new(0.0, -r));
    outline.push(notch);
    for i in 1..5 {
        let a = TAU * i as f32 / 5.0;
        let (s, c) = a.sin_cos();
        outline.push(Vec2::new(s * r, -c * r));
        outline.push(Vec2::new(c * notch.x - s * notch.y, s * notch.x + c * notch.y));
    }
    outline
}

/// Shoelace area of a closed polygon.
#[cfg(test)]
fn polygon_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        .abs()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_has_ten_vertices_starting_at_top() {
        let outline = star(200.0);
        assert_eq!(outline.len(), 10);
        assert_eq!(outline[0].x, 0.0);
        assert!(outline[0].y < 0.0);
    }

    #[test]
    fn tips_share_outer_radius() {
        let outline = star(200.0);
        let r = outline[0].length();
        for tip in outline.iter().step_by(2) {
            assert!((tip.length() - r).abs() < 1e-3);
        }
        for notch in outline.iter().skip(1).step_by(2) {
            assert!(notch.length() < r * 0.5);
        }
    }

    #[test]
    fn area_tracks_requested_size() {
        let area = polygon_area(&star(200.0));
        assert!((area - 200.0).abs() < 2.0, "area was {area}");
    }

    #[test]
    fn zero_size_collapses_to_origin() {
        assert!(star(0.0).iter().all(|p| *p == Vec2::ZERO));
    }
}
