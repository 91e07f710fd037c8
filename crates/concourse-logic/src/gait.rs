//! Procedural walk cycle and limb pose.
//!
//! Presentation only: nothing here feeds back into steering. The engine keeps
//! two pieces of per-agent state for it (the accumulated walk-cycle phase and
//! the smoothed heading); everything else is derived fresh for each pose.
//!
//! | Motion | Shape |
//! |--------|-------|
//! | Leg / arm swing | `sin(c)`, opposite limbs half a cycle apart |
//! | Foot lift | `sin²(c)` on the positive half only, zero slope at contact |
//! | Bob | `(sin(2c − π/2) + 1) / 2`, two bounces per stride, never negative |
//! | Sway | `sin(c)` roll on the torso, halved on the head |

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::constants::{gait, rig};
use crate::geometry::{wrap_angle, Vec2, Vec3};

/// Tuning for the walk cycle and heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitParams {
    /// Walk-cycle radians per second of movement.
    pub cadence: f32,
    /// Speed above which the walk cycle advances.
    pub motion_threshold: f32,
    /// Speed above which the heading follows the velocity.
    pub heading_min_speed: f32,
    /// Per-tick blend factor toward the velocity heading.
    pub heading_smoothing: f32,
    pub swing_amplitude: f32,
    pub lift_height: f32,
    pub bob_height: f32,
    pub sway_amplitude: f32,
    /// Head roll as a fraction of torso roll.
    pub head_sway_factor: f32,
}

impl Default for GaitParams {
    fn default() -> Self {
        Self {
            cadence: gait::CADENCE,
            motion_threshold: gait::MOTION_THRESHOLD,
            heading_min_speed: gait::HEADING_MIN_SPEED,
            heading_smoothing: gait::HEADING_SMOOTHING,
            swing_amplitude: gait::SWING_AMPLITUDE,
            lift_height: gait::LIFT_HEIGHT,
            bob_height: gait::BOB_HEIGHT,
            sway_amplitude: gait::SWAY_AMPLITUDE,
            head_sway_factor: gait::HEAD_SWAY_FACTOR,
        }
    }
}

/// Euler rotation applied X (pitch), then Y (yaw), then Z (roll).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Placement of one body part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Rotation,
    pub scale: f32,
}

/// Full rig for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub torso: Transform,
    pub head: Transform,
    pub leg_left: Transform,
    pub leg_right: Transform,
    pub arm_left: Transform,
    pub arm_right: Transform,
}

/// Everything a pose is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitInput {
    pub position: Vec2,
    pub walk_cycle: f32,
    pub heading: f32,
    pub scale: f32,
}

/// Advance the walk cycle while moving; freeze it otherwise.
///
/// Every curve below is 2π-periodic, so the phase is kept in [0, 2π) to hold
/// precision over long runs.
pub fn advance_walk_cycle(cycle: f32, speed: f32, dt: f32, params: &GaitParams) -> f32 {
    if speed > params.motion_threshold {
        (cycle + params.cadence * dt).rem_euclid(TAU)
    } else {
        cycle
    }
}

/// Blend `current` toward `target` by `factor` along the shorter arc.
///
/// The result is normalized into (−π, π].
pub fn blend_heading(current: f32, target: f32, factor: f32) -> f32 {
    let diff = wrap_angle(target - current);
    wrap_angle(current + diff * factor)
}

/// Smooth the heading toward the velocity direction while moving fast enough.
pub fn smooth_heading(heading: f32, velocity: Vec2, speed: f32, params: &GaitParams) -> f32 {
    if speed > params.heading_min_speed {
        blend_heading(heading, velocity.yaw(), params.heading_smoothing)
    } else {
        heading
    }
}

/// Limb swing angle.
pub fn swing(cycle: f32, amplitude: f32) -> f32 {
    cycle.sin() * amplitude
}

/// Foot lift: `sin²` over the positive half-cycle, zero otherwise.
pub fn foot_lift(cycle: f32, height: f32) -> f32 {
    let s = cycle.sin();
    if s > 0.0 {
        s * s * height
    } else {
        0.0
    }
}

/// Vertical bob at twice the cycle frequency, in `[0, height]`.
pub fn bob(cycle: f32, height: f32) -> f32 {
    ((2.0 * cycle - FRAC_PI_2).sin() + 1.0) / 2.0 * height
}

/// Torso roll.
pub fn sway(cycle: f32, amplitude: f32) -> f32 {
    cycle.sin() * amplitude
}

/// Derive the full rig for one agent.
pub fn compute_pose(input: &GaitInput, params: &GaitParams) -> Pose {
    let s = input.scale;
    let c = input.walk_cycle;
    let heading = input.heading;

    let leg_angle = swing(c, params.swing_amplitude);
    let arm_angle = swing(c, params.swing_amplitude);
    let lift_left = foot_lift(c, params.lift_height);
    let lift_right = foot_lift(c + PI, params.lift_height);
    let bob = bob(c, params.bob_height);
    let sway = sway(c, params.sway_amplitude);

    let base_y = rig::BASE_HEIGHT * s;
    let (sin_h, cos_h) = heading.sin_cos();

    let core = |height: f32, roll: f32| Transform {
        translation: Vec3::new(input.position.x, base_y + height * s + bob, input.position.z),
        rotation: Rotation {
            pitch: 0.0,
            yaw: heading,
            roll,
        },
        scale: s,
    };

    // Lateral offset along the body's local X, rotated into the heading.
    let limb = |lateral: f32, height: f32, pitch: f32, lift: f32| Transform {
        translation: Vec3::new(
            input.position.x + lateral * cos_h * s,
            base_y + height * s + bob + lift,
            input.position.z - lateral * sin_h * s,
        ),
        rotation: Rotation {
            pitch,
            yaw: heading,
            roll: 0.0,
        },
        scale: s,
    };

    Pose {
        torso: core(rig::TORSO_HEIGHT, sway),
        head: core(rig::HEAD_HEIGHT, sway * params.head_sway_factor),
        leg_left: limb(-rig::LEG_LATERAL, rig::LEG_HEIGHT, leg_angle, lift_left),
        leg_right: limb(rig::LEG_LATERAL, rig::LEG_HEIGHT, -leg_angle, lift_right),
        arm_left: limb(-rig::ARM_LATERAL, rig::ARM_HEIGHT, -arm_angle, 0.0),
        arm_right: limb(rig::ARM_LATERAL, rig::ARM_HEIGHT, arm_angle, 0.0),
    }
}
