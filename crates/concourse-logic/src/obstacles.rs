//! Obstacle footprints: the static field agents steer around and collide with.
//!
//! Footprints are axis-aligned rectangles (centre + independent half-extents).
//! Every test against them is rectangle-vs-point, never circular.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Vec2};

/// Axis-aligned footprint of a seat, pillar, desk or luggage pile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center_x: f32,
    pub center_z: f32,
    pub half_width: f32,
    pub half_depth: f32,
}

impl Obstacle {
    pub fn new(center_x: f32, center_z: f32, half_width: f32, half_depth: f32) -> Self {
        Self {
            center_x,
            center_z,
            half_width,
            half_depth,
        }
    }

    /// Square footprint with equal half-extents.
    pub fn square(center_x: f32, center_z: f32, half_extent: f32) -> Self {
        Self::new(center_x, center_z, half_extent, half_extent)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_z)
    }

    /// The larger of the two half-extents.
    pub fn max_half_extent(&self) -> f32 {
        self.half_width.max(self.half_depth)
    }

    /// True if `point` lies strictly inside the footprint grown by `margin`.
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        (point.x - self.center_x).abs() < self.half_width + margin
            && (point.z - self.center_z).abs() < self.half_depth + margin
    }

    /// Footprint grown by `margin` on every side.
    pub fn inflated_bounds(&self, margin: f32) -> Bounds {
        Bounds::new(
            self.center_x - self.half_width - margin,
            self.center_x + self.half_width + margin,
            self.center_z - self.half_depth - margin,
            self.center_z + self.half_depth + margin,
        )
    }
}

/// Immutable set of footprints shared read-only by every agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True if `point`, inflated by `margin`, overlaps any footprint.
    pub fn is_inside(&self, point: Vec2, margin: f32) -> bool {
        self.obstacles.iter().any(|o| o.contains(point, margin))
    }

    /// Rejection-sample a free point in `bounds`; `None` once `max_attempts`
    /// candidates have all landed inside a footprint.
    pub fn try_sample_free_point<R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        margin: f32,
        max_attempts: u32,
        rng: &mut R,
    ) -> Option<Vec2> {
        (0..max_attempts)
            .map(|_| bounds.sample(rng))
            .find(|p| !self.is_inside(*p, margin))
    }

    /// Like [`Self::try_sample_free_point`], returning `fallback` when the
    /// attempt budget runs out.
    pub fn sample_free_point<R: Rng + ?Sized>(
        &self,
        bounds: &Bounds,
        margin: f32,
        max_attempts: u32,
        fallback: Vec2,
        rng: &mut R,
    ) -> Vec2 {
        self.try_sample_free_point(bounds, margin, max_attempts, rng)
            .unwrap_or(fallback)
    }
}

impl From<Vec<Obstacle>> for ObstacleField {
    fn from(obstacles: Vec<Obstacle>) -> Self {
        Self::new(obstacles)
    }
}

impl<'a> IntoIterator for &'a ObstacleField {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
