//! Seek-plus-avoidance steering for walking agents.
//!
//! Algorithm, once per tick:
//! 1. Seek: unit vector toward the target (or arrival if within threshold)
//! 2. Avoid: sum of unit repulsions from every obstacle centre in range
//! 3. Blend: seek + avoidance × weight, renormalized (avoidance dominates)
//! 4. Low-pass the velocity toward blend × cruise speed, then clamp overspeed

use serde::{Deserialize, Serialize};

use crate::constants::{crowd, steering};
use crate::geometry::{Vec2, NORMALIZE_EPSILON};
use crate::obstacles::ObstacleField;

/// Tuning for [`steer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringParams {
    /// Target walking speed (units per second).
    pub cruise_speed: f32,
    /// Allowed burst above cruise speed.
    pub overspeed_factor: f32,
    /// Distance at which the target counts as reached.
    pub arrival_threshold: f32,
    /// Added to an obstacle's larger half-extent to get its repulsion range.
    pub lookahead_radius: f32,
    /// Weight of the avoidance direction relative to a seek weight of 1.
    pub avoidance_weight: f32,
    /// Per-tick low-pass factor toward the desired velocity, in (0, 1].
    pub velocity_smoothing: f32,
    /// Sideways push applied when avoidance opposes the seek direction head-on.
    pub sidestep_bias: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            cruise_speed: crowd::CRUISE_SPEED,
            overspeed_factor: crowd::OVERSPEED_FACTOR,
            arrival_threshold: steering::ARRIVAL_THRESHOLD,
            lookahead_radius: steering::LOOKAHEAD_RADIUS,
            avoidance_weight: steering::AVOIDANCE_WEIGHT,
            velocity_smoothing: steering::VELOCITY_SMOOTHING,
            sidestep_bias: steering::SIDESTEP_BIAS,
        }
    }
}

impl SteeringParams {
    pub fn max_speed(&self) -> f32 {
        self.cruise_speed * self.overspeed_factor
    }
}

/// Result of steering one walking agent for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteeringOutcome {
    /// Within the arrival threshold; the caller switches the agent to waiting.
    Arrived,
    /// New (smoothed, clamped) velocity and its magnitude.
    Steer { velocity: Vec2, speed: f32 },
}

/// Raw (unnormalized) sum of unit repulsions from every obstacle in range.
///
/// An obstacle is in range when its centre is closer than its larger
/// half-extent plus `lookahead_radius`. An agent sitting exactly on a centre
/// gets no push from that obstacle.
pub fn avoidance_force(position: Vec2, field: &ObstacleField, lookahead_radius: f32) -> Vec2 {
    let mut force = Vec2::ZERO;
    for obstacle in field {
        let away = position - obstacle.center();
        let dist = away.length();
        let range = obstacle.max_half_extent() + lookahead_radius;
        if dist < range && dist > NORMALIZE_EPSILON {
            force += away * (1.0 / dist);
        }
    }
    force
}

/// Blend a unit seek direction with a raw avoidance force into a unit
/// steering direction.
///
/// Cancelled avoidance (zero sum) steers by seek alone. Avoidance that points
/// straight back along the seek direction is bent toward the seek
/// direction's left so symmetric approaches still go around.
pub fn steering_direction(seek: Vec2, avoidance: Vec2, params: &SteeringParams) -> Vec2 {
    let Some(mut avoid) = avoidance.try_normalize() else {
        return seek;
    };

    if avoid.dot(seek) < steering::HEAD_ON_COSINE {
        avoid = (avoid + seek.perp() * params.sidestep_bias).normalize_or_zero();
    }

    (seek + avoid * params.avoidance_weight)
        .try_normalize()
        .unwrap_or(seek)
}

/// Low-pass `velocity` toward `direction × cruise speed`, then clamp.
pub fn smooth_velocity(velocity: Vec2, direction: Vec2, params: &SteeringParams) -> Vec2 {
    let desired = direction * params.cruise_speed;
    let smoothed = velocity + (desired - velocity) * params.velocity_smoothing;
    smoothed.clamp_length(params.max_speed())
}

/// Steer a walking agent toward `target` around the obstacle field.
pub fn steer(
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    field: &ObstacleField,
    params: &SteeringParams,
) -> SteeringOutcome {
    let to_target = target - position;
    if to_target.length() < params.arrival_threshold {
        return SteeringOutcome::Arrived;
    }
    // A zero threshold can leave the agent on top of its target.
    let Some(seek) = to_target.try_normalize() else {
        return SteeringOutcome::Arrived;
    };

    let avoidance = avoidance_force(position, field, params.lookahead_radius);
    let direction = steering_direction(seek, avoidance, params);
    let velocity = smooth_velocity(velocity, direction, params);

    SteeringOutcome::Steer {
        velocity,
        speed: velocity.length(),
    }
}
