//! Default tuning values for the lounge crowd.
//!
//! Speeds are world units per second and timers are simulated seconds.
//! Per-tick factors (smoothing, damping) are applied once per tick and were
//! tuned at a 60 Hz frame rate.

pub mod crowd {
    pub const AGENT_COUNT: usize = 100;
    /// 0.08 units per frame at 60 Hz.
    pub const CRUISE_SPEED: f32 = 4.8;
    pub const OVERSPEED_FACTOR: f32 = 1.5;
    pub const WORLD_HALF_EXTENT: f32 = 180.0;
    pub const SPAWN_HALF_EXTENT: f32 = 150.0;
    pub const TARGET_HALF_EXTENT: f32 = 140.0;
    pub const SPAWN_ATTEMPTS: u32 = 20;
    pub const TARGET_ATTEMPTS: u32 = 10;
    /// Clearance kept from footprints when placing agents and targets.
    pub const PLACEMENT_CLEARANCE: f32 = 0.8;
    pub const SCALE_MIN: f32 = 1.0;
    pub const SCALE_JITTER: f32 = 0.1;
    pub const MAX_DT: f32 = 0.1;
    pub const SEED: u64 = 0x1A0_C0DE;
}

pub mod steering {
    pub const ARRIVAL_THRESHOLD: f32 = 2.0;
    pub const LOOKAHEAD_RADIUS: f32 = 4.0;
    pub const AVOIDANCE_WEIGHT: f32 = 4.0;
    pub const VELOCITY_SMOOTHING: f32 = 0.1;
    pub const SIDESTEP_BIAS: f32 = 0.5;
    /// Avoidance pointing this directly against the seek direction is head-on.
    pub const HEAD_ON_COSINE: f32 = -0.999;
}

pub mod behavior {
    pub const ARRIVAL_WAIT_MIN: f32 = 2.0;
    pub const ARRIVAL_WAIT_MAX: f32 = 6.0;
    pub const RECOVERY_WAIT_MIN: f32 = 0.2;
    pub const RECOVERY_WAIT_MAX: f32 = 0.4;
    pub const WAITING_DAMPING: f32 = 0.9;
}

pub mod collision {
    pub const RADIUS: f32 = 0.6;
    pub const DAMPING: f32 = 0.5;
    pub const PASSES: u32 = 4;
}

pub mod liveness {
    /// 0.5 units per second, sampled at 60 Hz.
    pub const PROGRESS_THRESHOLD: f32 = 0.48;
    pub const STUCK_DURATION: f32 = 0.5;
}

pub mod gait {
    /// Walk-cycle radians per second.
    pub const CADENCE: f32 = 8.0;
    pub const MOTION_THRESHOLD: f32 = 0.6;
    pub const HEADING_MIN_SPEED: f32 = 3.0;
    pub const HEADING_SMOOTHING: f32 = 0.05;
    pub const SWING_AMPLITUDE: f32 = 0.6;
    pub const LIFT_HEIGHT: f32 = 0.3;
    pub const BOB_HEIGHT: f32 = 0.15;
    pub const SWAY_AMPLITUDE: f32 = 0.05;
    pub const HEAD_SWAY_FACTOR: f32 = 0.5;
}

/// Rig offsets in model units, multiplied by each agent's scale.
pub mod rig {
    pub const BASE_HEIGHT: f32 = 3.2;
    pub const TORSO_HEIGHT: f32 = 2.8;
    pub const HEAD_HEIGHT: f32 = 4.8;
    pub const LEG_LATERAL: f32 = 0.5;
    pub const LEG_HEIGHT: f32 = 1.2;
    pub const ARM_LATERAL: f32 = 1.1;
    pub const ARM_HEIGHT: f32 = 2.8;
}
