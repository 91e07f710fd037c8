//! Minimum-penetration push-out against obstacle footprints.
//!
//! The agent is a point with a physical radius; each obstacle is inflated by
//! that radius. An overlapping agent is pushed out along the axis of least
//! penetration, its velocity on that axis is cancelled, and the whole velocity
//! is damped so it does not vibrate against the obstacle next tick.

use serde::{Deserialize, Serialize};

use crate::constants::collision;
use crate::geometry::Vec2;
use crate::obstacles::{Obstacle, ObstacleField};

/// Tuning for [`resolve_collisions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionParams {
    /// Physical radius of an agent.
    pub radius: f32,
    /// Velocity multiplier applied on every push-out.
    pub damping: f32,
    /// Maximum sweeps over the field per tick.
    pub passes: u32,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            radius: collision::RADIUS,
            damping: collision::DAMPING,
            passes: collision::PASSES,
        }
    }
}

/// Axis an agent was pushed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushAxis {
    X,
    Z,
}

/// Overlap of a point with an inflated footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Depth along X (`inflated half-width − |dx|`), positive when overlapping.
    pub x: f32,
    /// Depth along Z (`inflated half-depth − |dz|`), positive when overlapping.
    pub z: f32,
}

impl Penetration {
    /// Shallower axis; ties go to Z.
    pub fn axis(&self) -> PushAxis {
        if self.x < self.z {
            PushAxis::X
        } else {
            PushAxis::Z
        }
    }
}

/// Penetration of `position` into `obstacle` inflated by `radius`, if any.
pub fn penetration(position: Vec2, obstacle: &Obstacle, radius: f32) -> Option<Penetration> {
    let dx = (position.x - obstacle.center_x).abs();
    let dz = (position.z - obstacle.center_z).abs();
    let reach_x = obstacle.half_width + radius;
    let reach_z = obstacle.half_depth + radius;

    if dx < reach_x && dz < reach_z {
        Some(Penetration {
            x: reach_x - dx,
            z: reach_z - dz,
        })
    } else {
        None
    }
}

/// Push the agent out of a single obstacle. Returns the push axis, or `None`
/// if there was no overlap.
pub fn resolve_obstacle(
    position: &mut Vec2,
    velocity: &mut Vec2,
    obstacle: &Obstacle,
    params: &CollisionParams,
) -> Option<PushAxis> {
    let pen = penetration(*position, obstacle, params.radius)?;
    let axis = pen.axis();

    match axis {
        PushAxis::X => {
            if position.x - obstacle.center_x > 0.0 {
                position.x += pen.x;
            } else {
                position.x -= pen.x;
            }
            velocity.x = 0.0;
        }
        PushAxis::Z => {
            if position.z - obstacle.center_z > 0.0 {
                position.z += pen.z;
            } else {
                position.z -= pen.z;
            }
            velocity.z = 0.0;
        }
    }
    *velocity *= params.damping;

    Some(axis)
}

/// Resolve every overlap, obstacle by obstacle in field order.
///
/// A push-out can land the agent inside an obstacle visited earlier in the
/// same sweep (the lounge seats overlap), so sweeps repeat until one finds no
/// overlap or `params.passes` is spent. Returns the number of push-outs.
pub fn resolve_collisions(
    position: &mut Vec2,
    velocity: &mut Vec2,
    field: &ObstacleField,
    params: &CollisionParams,
) -> u32 {
    let mut pushes = 0;
    for _ in 0..params.passes.max(1) {
        let mut swept = 0;
        for obstacle in field {
            if resolve_obstacle(position, velocity, obstacle, params).is_some() {
                swept += 1;
            }
        }
        pushes += swept;
        if swept == 0 {
            break;
        }
    }
    pushes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CollisionParams {
        CollisionParams::default()
    }

    #[test]
    fn no_overlap_is_untouched() {
        let o = Obstacle::square(0.0, 0.0, 1.0);
        let mut p = Vec2::new(5.0, 0.0);
        let mut v = Vec2::new(1.0, 1.0);
        assert_eq!(resolve_obstacle(&mut p, &mut v, &o, &params()), None);
        assert_eq!(p, Vec2::new(5.0, 0.0));
        assert_eq!(v, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn pushes_along_shallow_x() {
        let o = Obstacle::square(0.0, 0.0, 2.0);
        // Reach is 2.6; agent is 0.1 deep on X, 2.6 deep on Z.
        let mut p = Vec2::new(2.5, 0.0);
        let mut v = Vec2::new(-1.0, 1.0);
        let axis = resolve_obstacle(&mut p, &mut v, &o, &params());
        assert_eq!(axis, Some(PushAxis::X));
        assert!((p.x - 2.6).abs() < 1e-5, "x={}", p.x);
        assert_eq!(p.z, 0.0);
        assert_eq!(v.x, 0.0);
        assert!((v.z - 0.5).abs() < 1e-6, "damped z, got {}", v.z);
    }

    #[test]
    fn pushes_along_shallow_z_toward_negative_side() {
        let o = Obstacle::new(0.0, 0.0, 5.0, 1.0);
        let mut p = Vec2::new(1.0, -1.2);
        let mut v = Vec2::new(2.0, 2.0);
        let axis = resolve_obstacle(&mut p, &mut v, &o, &params());
        assert_eq!(axis, Some(PushAxis::Z));
        assert!((p.z + 1.6).abs() < 1e-5, "z={}", p.z);
        assert_eq!(p.x, 1.0);
        assert_eq!(v, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn ends_outside_inflated_footprint() {
        let o = Obstacle::new(3.0, -2.0, 1.5, 0.7);
        for i in 0..50 {
            for j in 0..50 {
                let mut p = Vec2::new(1.0 + i as f32 * 0.08, -3.5 + j as f32 * 0.06);
                let mut v = Vec2::ZERO;
                resolve_obstacle(&mut p, &mut v, &o, &params());
                assert!(
                    penetration(p, &o, params().radius).map_or(true, |pen| pen.x < 1e-4 || pen.z < 1e-4),
                    "still inside at {p:?}"
                );
            }
        }
    }

    #[test]
    fn overlapping_obstacles_fully_resolved() {
        // Two seats closer than their inflated reach, like a lounge row.
        let field = ObstacleField::new(vec![
            Obstacle::square(3.0, 0.0, 2.5),
            Obstacle::square(0.0, 0.0, 2.5),
        ]);
        let mut p = Vec2::new(1.4, 2.9);
        let mut v = Vec2::new(0.0, -1.0);
        let pushes = resolve_collisions(&mut p, &mut v, &field, &params());
        assert!(pushes >= 1);
        for o in &field {
            let pen = penetration(p, o, params().radius);
            assert!(pen.map_or(true, |pen| pen.x < 1e-4 || pen.z < 1e-4), "{p:?}");
        }
        assert!(v.is_finite());
    }

    #[test]
    fn exact_centre_is_pushed_out() {
        let o = Obstacle::square(0.0, 0.0, 1.0);
        let mut p = Vec2::ZERO;
        let mut v = Vec2::ZERO;
        assert_eq!(resolve_obstacle(&mut p, &mut v, &o, &params()), Some(PushAxis::Z));
        assert!((p.z + 1.6).abs() < 1e-6);
        assert!(penetration(p, &o, 0.6).is_none());
    }

    #[test]
    fn zero_passes_still_sweeps_once() {
        let field = ObstacleField::new(vec![Obstacle::square(0.0, 0.0, 1.0)]);
        let p_ = CollisionParams {
            passes: 0,
            ..params()
        };
        let mut p = Vec2::new(0.5, 0.0);
        let mut v = Vec2::ZERO;
        assert_eq!(resolve_collisions(&mut p, &mut v, &field, &p_), 1);
    }
}
