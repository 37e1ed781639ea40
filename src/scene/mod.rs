//! Retained 2-D scene: a point layer and a centroid layer.
//!
//! Points are created once per dataset by [`Scene::draw_points`] and only
//! recolored afterwards. Centroids are reconciled per snapshot by cluster
//! index (enter / update / exit). Every animated attribute is a
//! [`Tween`](tween::Tween); [`Scene::frame`] samples them all at a point in
//! time and hands the resolved primitives to whatever draws them.

pub mod diff;
pub mod glyph;
pub mod svg;
pub mod tween;

use glam::Vec2;
use rustc_hash::FxHashMap;
use web_time::Instant;

use self::diff::diff_keys;
use self::tween::Tween;
use crate::geometry::GeometryMapper;
use crate::model::{Dataset, Snapshot};
use crate::options::{AnimationOptions, StyleOptions};
use crate::util::palette::{Palette, Rgb};

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// One data sample on screen. Position is fixed for the dataset's lifetime.
#[derive(Debug, Clone)]
struct PointMarker {
    center: Vec2,
    fill: Tween<Rgb>,
}

/// One cluster centroid on screen, keyed by cluster index.
#[derive(Debug, Clone)]
struct CentroidMarker {
    center: Tween<Vec2>,
    fill: Rgb,
    opacity: Tween<f32>,
}

// ---------------------------------------------------------------------------
// Frame output
// ---------------------------------------------------------------------------

/// A point marker resolved at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPrimitive {
    /// Center in chart pixels.
    pub center: Vec2,
    /// Circle radius in pixels.
    pub radius: f32,
    /// Fill color.
    pub fill: Rgb,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// A centroid marker resolved at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentroidPrimitive {
    /// Cluster index.
    pub cluster: usize,
    /// Center in chart pixels.
    pub center: Vec2,
    /// Star glyph area in square pixels.
    pub size: f32,
    /// Fill color.
    pub fill: Rgb,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// Everything visible at one instant, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneFrame {
    /// Point markers in dataset order.
    pub points: Vec<PointPrimitive>,
    /// Centroid markers by ascending cluster index.
    pub centroids: Vec<CentroidPrimitive>,
}

/// What a centroid reconciliation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CentroidUpdate {
    /// Markers created.
    pub entered: usize,
    /// Existing markers sent toward a new position.
    pub moved: usize,
    /// Markers removed.
    pub exited: usize,
}

impl CentroidUpdate {
    /// Whether nothing on screen changed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.entered == 0 && self.moved == 0 && self.exited == 0
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The retained scene.
pub struct Scene {
    style: StyleOptions,
    timing: AnimationOptions,
    points: Vec<PointMarker>,
    centroids: FxHashMap<usize, CentroidMarker>,
    /// Monotonically increasing generation; bumped on any visual mutation.
    generation: u64,
    /// Generation that was last consumed by a consumer.
    rendered_generation: u64,
}

impl Scene {
    /// Empty scene with the given marker style and transition timing.
    #[must_use]
    pub fn new(style: StyleOptions, timing: AnimationOptions) -> Self {
        Self {
            style,
            timing,
            points: Vec::new(),
            centroids: FxHashMap::default(),
            generation: 0,
            rendered_generation: 0,
        }
    }

    // -- Mutation helpers --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether the scene changed since last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Mark current generation as consumed (call after exporting a frame).
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    // -- Layers --

    /// Replace the whole scene with one neutral marker per sample.
    pub fn draw_points(&mut self, dataset: &Dataset, mapper: &GeometryMapper) {
        self.centroids.clear();
        let neutral = self.style.neutral_fill;
        self.points = dataset
            .samples()
            .iter()
            .map(|&sample| PointMarker {
                center: mapper.project(sample),
                fill: Tween::fixed(neutral),
            })
            .collect();
        self.invalidate();
    }

    /// Recolor every point by its label in `snapshot`, matched by position
    /// in dataset order. Returns how many points started a new transition.
    pub fn apply_assignment(
        &mut self,
        snapshot: &Snapshot,
        palette: &Palette,
        now: Instant,
    ) -> usize {
        let duration = self.timing.assignment();
        let easing = self.timing.easing;
        let mut recolored = 0;
        for (marker, &label) in self.points.iter_mut().zip(&snapshot.labels) {
            if marker
                .fill
                .retarget(palette.color(label), now, duration, easing)
            {
                recolored += 1;
            }
        }
        if recolored > 0 {
            self.invalidate();
        }
        recolored
    }

    /// Reconcile centroid markers against `snapshot.centroids`, keyed by
    /// cluster index.
    pub fn apply_centroids(
        &mut self,
        snapshot: &Snapshot,
        mapper: &GeometryMapper,
        palette: &Palette,
        now: Instant,
    ) -> CentroidUpdate {
        let diff = diff_keys(
            self.centroids.keys().copied(),
            0..snapshot.centroids.len(),
        );
        let timing = &self.timing;
        let mut update = CentroidUpdate {
            exited: diff.exit.len(),
            ..CentroidUpdate::default()
        };

        for cluster in &diff.exit {
            let _ = self.centroids.remove(cluster);
        }

        for &cluster in &diff.enter {
            let center = mapper.project(snapshot.centroids[cluster]);
            let marker = CentroidMarker {
                center: Tween::fixed(center),
                fill: palette.color(cluster),
                opacity: Tween::animate(
                    0.0,
                    1.0,
                    now,
                    timing.centroid_fade(),
                    timing.easing,
                ),
            };
            let _ = self.centroids.insert(cluster, marker);
            update.entered += 1;
        }

        for &cluster in &diff.update {
            let target = mapper.project(snapshot.centroids[cluster]);
            if let Some(marker) = self.centroids.get_mut(&cluster) {
                if marker.center.retarget(
                    target,
                    now,
                    timing.centroid_move(),
                    timing.easing,
                ) {
                    update.moved += 1;
                }
            }
        }

        if !update.is_noop() {
            self.invalidate();
        }
        update
    }

    // -- Queries --

    /// Number of point markers.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of centroid markers.
    #[must_use]
    pub fn centroid_count(&self) -> usize {
        self.centroids.len()
    }

    /// Whether any transition is still running at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.points.iter().any(|p| !p.fill.is_settled(now))
            || self.centroids.values().any(|c| {
                !c.center.is_settled(now) || !c.opacity.is_settled(now)
            })
    }

    /// Sample every marker at `now`.
    #[must_use]
    pub fn frame(&self, now: Instant) -> SceneFrame {
        let points = self
            .points
            .iter()
            .map(|p| PointPrimitive {
                center: p.center,
                radius: self.style.point_radius,
                fill: p.fill.value_at(now),
                opacity: self.style.point_opacity,
            })
            .collect();

        let mut centroids: Vec<CentroidPrimitive> = self
            .centroids
            .iter()
            .map(|(&cluster, c)| CentroidPrimitive {
                cluster,
                center: c.center.value_at(now),
                size: self.style.centroid_size,
                fill: c.fill,
                opacity: c.opacity.value_at(now),
            })
            .collect();
        centroids.sort_unstable_by_key(|c| c.cluster);

        SceneFrame { points, centroids }
    }
}
