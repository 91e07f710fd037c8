//! C FFI bindings for the Concourse crowd simulation
//!
//! This crate provides a C-compatible API so a renderer written in any
//! language can drive the crowd and draw it with instanced meshes.
//!
//! # Basic Usage (C)
//! ```c
//! #include "concourse.h"
//!
//! // Create simulation
//! ConcourseHandle sim = concourse_create(42, 100);
//!
//! // Frame loop
//! while (running) {
//!     concourse_tick(sim, delta_time);
//!
//!     uint32_t count = concourse_agent_count(sim);
//!     for (uint32_t i = 0; i < count; i++) {
//!         ConcoursePose pose;
//!         if (concourse_get_pose(sim, i, &pose)) {
//!             // Write pose.torso, pose.head, pose.leg_left, ... into instance buffers
//!         }
//!     }
//! }
//!
//! // Cleanup
//! concourse_destroy(sim);
//! ```
//!
//! Handles are not thread safe; callers serialize access.

use std::ffi::CStr;
use std::os::raw::c_char;

use concourse_core::prelude::*;

/// Opaque handle to a crowd simulation
pub type ConcourseHandle = *mut CrowdSimulation;

/// One body part: translation, Euler rotation (radians) and uniform scale
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConcourseTransform {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Rotation about X
    pub pitch: f32,
    /// Rotation about Y (0 faces +Z)
    pub yaw: f32,
    /// Rotation about Z
    pub roll: f32,
    pub scale: f32,
}

/// Full rig for one agent
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConcoursePose {
    pub torso: ConcourseTransform,
    pub head: ConcourseTransform,
    pub leg_left: ConcourseTransform,
    pub leg_right: ConcourseTransform,
    pub arm_left: ConcourseTransform,
    pub arm_right: ConcourseTransform,
}

/// Agent state returned to C
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConcourseAgent {
    /// Index of this agent (0 to agent_count-1)
    pub index: u32,
    pub x: f32,
    pub z: f32,
    /// Velocity in world units per second
    pub vx: f32,
    pub vz: f32,
    pub speed: f32,
    /// Smoothed yaw in radians
    pub heading: f32,
    pub scale: f32,
    /// 0 = walking, 1 = waiting
    pub state: u8,
    pub target_x: f32,
    pub target_z: f32,
    /// Seconds left while waiting
    pub wait_timer: f32,
}

/// Obstacle footprint (for debug drawing)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConcourseObstacle {
    pub center_x: f32,
    pub center_z: f32,
    pub half_width: f32,
    pub half_depth: f32,
}

/// Simulation statistics
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConcourseStats {
    /// Simulated seconds since creation
    pub sim_time: f64,
    pub tick_count: u64,
    pub agent_count: u32,
    pub obstacle_count: u32,
    pub arrivals: u64,
    pub recoveries: u64,
    pub departures: u64,
    pub collisions: u64,
    pub sampler_fallbacks: u64,
}

impl From<&Transform> for ConcourseTransform {
    fn from(t: &Transform) -> Self {
        Self {
            x: t.translation.x,
            y: t.translation.y,
            z: t.translation.z,
            pitch: t.rotation.pitch,
            yaw: t.rotation.yaw,
            roll: t.rotation.roll,
            scale: t.scale,
        }
    }
}

impl From<&Pose> for ConcoursePose {
    fn from(p: &Pose) -> Self {
        Self {
            torso: (&p.torso).into(),
            head: (&p.head).into(),
            leg_left: (&p.leg_left).into(),
            leg_right: (&p.leg_right).into(),
            arm_left: (&p.arm_left).into(),
            arm_right: (&p.arm_right).into(),
        }
    }
}

// ============================================================================
// Lifecycle Functions
// ============================================================================

fn into_handle(result: Result<CrowdSimulation, ConfigError>) -> ConcourseHandle {
    match result {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(e) => {
            log::warn!("concourse: rejected configuration: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Create the airport lounge with default tuning
///
/// Returns a handle that must be freed with `concourse_destroy`.
#[no_mangle]
pub extern "C" fn concourse_create(seed: u64, agent_count: u32) -> ConcourseHandle {
    let config = CrowdConfig {
        seed,
        agent_count: agent_count as usize,
        ..CrowdConfig::default()
    };
    into_handle(CrowdSimulation::new(config))
}

/// Create a simulation from a NUL-terminated JSON configuration
///
/// Returns null if the string is not valid UTF-8, not valid JSON, or
/// describes an invalid configuration.
#[no_mangle]
pub extern "C" fn concourse_create_from_json(json: *const c_char) -> ConcourseHandle {
    if json.is_null() {
        return std::ptr::null_mut();
    }

    let text = unsafe { CStr::from_ptr(json) };
    let text = match text.to_str() {
        Ok(t) => t,
        Err(e) => {
            log::warn!("concourse: configuration is not UTF-8: {}", e);
            return std::ptr::null_mut();
        }
    };
    into_handle(CrowdConfig::from_json_str(text).and_then(CrowdSimulation::new))
}

/// Destroy a simulation and free its memory
#[no_mangle]
pub extern "C" fn concourse_destroy(handle: ConcourseHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

// ============================================================================
// Simulation Control
// ============================================================================

/// Advance the crowd by delta_seconds
///
/// Non-positive or non-finite steps are ignored; long steps are clamped.
#[no_mangle]
pub extern "C" fn concourse_tick(handle: ConcourseHandle, delta_seconds: f32) {
    if handle.is_null() {
        return;
    }

    let sim = unsafe { &mut *handle };
    sim.tick(delta_seconds);
}

// ============================================================================
// Query Functions
// ============================================================================

/// Get the number of agents
#[no_mangle]
pub extern "C" fn concourse_agent_count(handle: ConcourseHandle) -> u32 {
    if handle.is_null() {
        return 0;
    }

    let sim = unsafe { &*handle };
    sim.agent_count() as u32
}

/// Get the pose of one agent
///
/// Returns true if successful, false if index out of bounds
#[no_mangle]
pub extern "C" fn concourse_get_pose(
    handle: ConcourseHandle,
    index: u32,
    pose: *mut ConcoursePose,
) -> bool {
    if handle.is_null() || pose.is_null() {
        return false;
    }

    let sim = unsafe { &*handle };
    match sim.try_pose(index as usize) {
        Some(p) => {
            unsafe { *pose = ConcoursePose::from(&p) };
            true
        }
        None => false,
    }
}

/// Get agent state by index
///
/// Returns true if successful, false if index out of bounds
#[no_mangle]
pub extern "C" fn concourse_get_agent(
    handle: ConcourseHandle,
    index: u32,
    agent: *mut ConcourseAgent,
) -> bool {
    if handle.is_null() || agent.is_null() {
        return false;
    }

    let sim = unsafe { &*handle };
    let Some(a) = sim.agent(index as usize) else {
        return false;
    };

    let out = unsafe { &mut *agent };
    out.index = index;
    out.x = a.position.x;
    out.z = a.position.z;
    out.vx = a.velocity.x;
    out.vz = a.velocity.z;
    out.speed = a.speed;
    out.heading = a.heading;
    out.scale = a.scale;
    out.state = match a.state {
        AgentState::Walking => 0,
        AgentState::Waiting => 1,
    };
    out.target_x = a.target.x;
    out.target_z = a.target.z;
    out.wait_timer = a.wait_timer;

    true
}

/// Get the number of obstacles
#[no_mangle]
pub extern "C" fn concourse_obstacle_count(handle: ConcourseHandle) -> u32 {
    if handle.is_null() {
        return 0;
    }

    let sim = unsafe { &*handle };
    sim.obstacles().len() as u32
}

/// Get an obstacle footprint by index
///
/// Returns true if successful, false if index out of bounds
#[no_mangle]
pub extern "C" fn concourse_get_obstacle(
    handle: ConcourseHandle,
    index: u32,
    obstacle: *mut ConcourseObstacle,
) -> bool {
    if handle.is_null() || obstacle.is_null() {
        return false;
    }

    let sim = unsafe { &*handle };
    let Some(o) = sim.obstacles().get(index as usize) else {
        return false;
    };

    let out = unsafe { &mut *obstacle };
    out.center_x = o.center_x;
    out.center_z = o.center_z;
    out.half_width = o.half_width;
    out.half_depth = o.half_depth;

    true
}

/// Get simulation statistics
#[no_mangle]
pub extern "C" fn concourse_get_stats(handle: ConcourseHandle, stats: *mut ConcourseStats) -> bool {
    if handle.is_null() || stats.is_null() {
        return false;
    }

    let sim = unsafe { &*handle };
    let out = unsafe { &mut *stats };
    let s = sim.stats();

    out.sim_time = sim.sim_time();
    out.tick_count = sim.tick_count();
    out.agent_count = sim.agent_count() as u32;
    out.obstacle_count = sim.obstacles().len() as u32;
    out.arrivals = s.arrivals;
    out.recoveries = s.recoveries;
    out.departures = s.departures;
    out.collisions = s.collisions;
    out.sampler_fallbacks = s.sampler_fallbacks;

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn null_handles_are_tolerated() {
        let null = std::ptr::null_mut();
        concourse_tick(null, 0.016);
        concourse_destroy(null);
        assert_eq!(concourse_agent_count(null), 0);
        assert_eq!(concourse_obstacle_count(null), 0);

        let mut pose = ConcoursePose::default();
        let mut stats = ConcourseStats::default();
        assert!(!concourse_get_pose(null, 0, &mut pose));
        assert!(!concourse_get_stats(null, &mut stats));
        assert!(concourse_create_from_json(std::ptr::null()).is_null());
    }

    #[test]
    fn lifecycle_and_queries() {
        let sim = concourse_create(7, 12);
        assert!(!sim.is_null());
        assert_eq!(concourse_agent_count(sim), 12);
        assert_eq!(concourse_obstacle_count(sim), 135);

        for _ in 0..30 {
            concourse_tick(sim, 1.0 / 60.0);
        }

        let mut agent = ConcourseAgent::default();
        assert!(concourse_get_agent(sim, 3, &mut agent));
        assert_eq!(agent.index, 3);
        assert!(agent.state <= 1);

        let mut pose = ConcoursePose::default();
        assert!(concourse_get_pose(sim, 3, &mut pose));
        assert_eq!(pose.torso.x, agent.x);
        assert!(pose.head.y > pose.torso.y);
        assert!(!concourse_get_pose(sim, 12, &mut pose));
        assert!(!concourse_get_agent(sim, 12, &mut agent));

        let mut obstacle = ConcourseObstacle::default();
        assert!(concourse_get_obstacle(sim, 0, &mut obstacle));
        assert_eq!(obstacle.half_width, 2.5);
        assert!(!concourse_get_obstacle(sim, 135, &mut obstacle));

        let mut stats = ConcourseStats::default();
        assert!(concourse_get_stats(sim, &mut stats));
        assert_eq!(stats.tick_count, 30);
        assert!((stats.sim_time - 0.5).abs() < 1e-4);

        concourse_destroy(sim);
    }

    #[test]
    fn json_configuration() {
        let json = CString::new(r#"{ "agent_count": 4, "layout": { "kind": "custom", "obstacles": [] } }"#).unwrap();
        let sim = concourse_create_from_json(json.as_ptr());
        assert!(!sim.is_null());
        assert_eq!(concourse_agent_count(sim), 4);
        assert_eq!(concourse_obstacle_count(sim), 0);
        concourse_destroy(sim);

        let bad = CString::new(r#"{ "max_dt": -1.0 }"#).unwrap();
        assert!(concourse_create_from_json(bad.as_ptr()).is_null());
        let garbage = CString::new("not json").unwrap();
        assert!(concourse_create_from_json(garbage.as_ptr()).is_null());
    }
}
